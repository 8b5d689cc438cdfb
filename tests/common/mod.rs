use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Run the binary with `args`, feeding `stdin`, and wait for exit.
/// Returns (exit code, stdout, stderr).
pub fn run_cli(args: &[&str], stdin: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_gaslighter"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn binary");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// A source fixture with exactly two eligible lines: line 3 (1-based,
/// indented four spaces) and line 5 (at column 0). Everything else is
/// a comment, blank or too short.
pub const SAMPLE_SOURCE: &str = concat!(
    "// gaslighter sample fixture\n",
    "\n",
    "    let total = alpha + beta;\n",
    "ok;\n",
    "let grand_total = total * 2;\n",
    "# trailing marker line\n",
);

/// Write a `gaslighter.toml` with the given contents and return its path.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("gaslighter.toml");
    std::fs::write(&path, contents).unwrap();
    path
}
