/* crates/clinic-cli/src/ui.rs */

// Human-facing progress output; diagnostics go through tracing.
#![allow(clippy::print_stdout)]

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn ok(msg: &str) {
  println!("  {GREEN}\u{2713}{RESET} {msg}");
}

pub fn fail(msg: &str) {
  println!("  {RED}\u{2717}{RESET} {msg}");
}

pub fn warn(msg: &str) {
  println!("  {YELLOW}!{RESET} {msg}");
}

pub fn arrow(msg: &str) {
  println!("  {GREEN}\u{2192}{RESET} {msg}");
}

pub fn detail(msg: &str) {
  println!("        {DIM}{msg}{RESET}");
}

pub fn banner(cmd: &str) {
  println!();
  println!("  {BOLD}clinic{RESET} {cmd} {DIM}v{VERSION}{RESET}");
  println!();
}

/// Raw output meant for piping, e.g. a view model as JSON.
pub fn raw(text: &str) {
  println!("{text}");
}

pub fn plural(n: usize, one: &str, many: &str) -> String {
  format!("{n} {}", if n == 1 { one } else { many })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plural_forms() {
    assert_eq!(plural(1, "record", "records"), "1 record");
    assert_eq!(plural(0, "record", "records"), "0 records");
    assert_eq!(plural(7, "entry", "entries"), "7 entries");
  }
}
