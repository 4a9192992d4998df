use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Runs `f`, announcing `desc` on stderr before and its wall time after.
///
/// A failing step only gets the announcement; the error reaches the caller.
pub fn measure<T, E>(desc: &str, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    measure_to(&mut io::stderr(), desc, f)
}

fn measure_to<W: Write, T, E>(
    out: &mut W,
    desc: &str,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let _ = writeln!(out, "{desc} ...");
    let start = Instant::now();
    let ret = f()?;
    let _ = writeln!(out, "{}", format_elapsed(desc, start.elapsed()));
    Ok(ret)
}

/// `<desc>: <n>ms`, switching to whole seconds from ten seconds on.
pub fn format_elapsed(desc: &str, elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms >= 10_000 {
        format!("{desc}: {}s", ms / 1000)
    } else {
        format!("{desc}: {ms}ms")
    }
}
