//! Command: print version information.

/// Print the devenv version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("devenv {}", super::version_string());
}
