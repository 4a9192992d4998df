use rsb_core::model::{Field, FieldKind, Struc, StrucId, StrucTable};
use rsb_core::ScalarType;
use rsb_gen::{Call, Func, GenOptions, Program};

fn sample_program() -> Program {
    let mut strucs = StrucTable::new();
    let mut s1 = Struc::new(StrucId::from_index(1));
    s1.add_field(Field::scalar("_0", ScalarType::U8));
    s1.add_field(Field::scalar("_1", ScalarType::F64));
    strucs.insert(s1);
    let mut s2 = Struc::new(StrucId::from_index(2));
    s2.add_field(Field::new("_0", FieldKind::Pointer, 8, Some(StrucId::from_index(1))));
    s2.add_field(Field::new("_1", FieldKind::Struc, 0, Some(StrucId::from_index(1))));
    s2.add_field(Field::scalar("_2", ScalarType::I32));
    strucs.insert(s2);

    let mut f1 = Func::new(1);
    f1.add_argument(
        Field::new("_0", FieldKind::Pointer, 8, Some(StrucId::from_index(2))),
        &strucs,
    );
    f1.add_argument(Field::scalar("_1", ScalarType::F32), &strucs);
    f1.calls = vec![Call {
        callee: 2,
        args: vec!["0".into()],
    }];
    let mut f2 = Func::new(2);
    f2.add_argument(Field::scalar("_0", ScalarType::I16), &strucs);
    f2.calls = vec![Call {
        callee: 1,
        args: vec!["nullptr".into(), "0.0f".into()],
    }];

    Program {
        options: GenOptions::default(),
        strucs,
        funcs: vec![f1, f2],
    }
}

#[test]
fn type_dictionary_reaches_through_pointers_and_members() {
    let program = sample_program();
    let f1 = &program.funcs[0];
    assert_eq!(f1.candidates("rs_2*"), ["_0"]);
    assert_eq!(f1.candidates("rs_1*"), ["_0->_0"]);
    assert_eq!(f1.candidates("uint8_t"), ["_0->_0->_0", "_0->_1._0"]);
    assert_eq!(f1.candidates("rs_1"), ["_0->_1"]);
    assert_eq!(f1.candidates("f32_t"), ["_1"]);
    assert!(f1.candidates("int64_t").is_empty());
}

#[test]
fn program_renders_expected_translation_unit() {
    let expected = "//P\n\
\n\
struct rs_1 {\n    uint8_t _0;\n    f64_t _1;\n};\n\
\n\
struct rs_2 {\n    rs_1* _0;\n    rs_1 _1;\n    int32_t _2;\n};\n\
\n\
void f_1(rs_2* _0, f32_t _1);\n\
void f_2(int16_t _0);\n\
\n\
void f_1(rs_2* _0, f32_t _1) {\n\
\x20   _0->_0->_0 = use(_0->_0->_0);\n\
\x20   _0->_0->_1 = use(_0->_0->_1);\n\
\x20   _0->_1._0 = use(_0->_1._0);\n\
\x20   _0->_1._1 = use(_0->_1._1);\n\
\x20   _0->_2 = use(_0->_2);\n\
\x20   _1 = use(_1);\n\
\x20   f_2(0);\n\
}\n\
\n\
void f_2(int16_t _0) {\n\
\x20   _0 = use(_0);\n\
\x20   f_1(nullptr, 0.0f);\n\
}\n\
\n\
int main() {\n\
\x20   f_1(nullptr, 0.0f);\n\
\x20   f_2(0);\n\
\x20   return 0;\n\
}\n";
    assert_eq!(sample_program().render("//P\n"), expected);
}

#[test]
fn default_preamble_defines_use() {
    assert!(rsb_gen::PREAMBLE.contains("T use(T a)"));
    assert!(rsb_gen::PREAMBLE.contains("0x5851F42D4C957F2D"));
    assert!(rsb_gen::PREAMBLE.contains("0x14057B7EF767814F"));
}
