//! Terminal output helpers for the `up` binary.

use owo_colors::{OwoColorize, Stream};

use uplua_lib::registry::Registry;

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const INFO: &str = "•";
}

/// Opening banner listing the declaration files about to be loaded.
pub fn banner(origins: &[String]) {
  println!("{}", "up!".if_supports_color(Stream::Stdout, |s| s.bold()));
  for origin in origins {
    println!(
      "{} {}/up.lua",
      symbols::INFO.if_supports_color(Stream::Stdout, |s| s.cyan()),
      origin
    );
  }
}

/// Post-generation summary of what the registry contained.
pub fn summary(registry: &Registry) {
  println!(
    "{} Generated artifacts for {} source module(s) and {} jar libraries",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    registry.sources().len(),
    registry.libraries().len()
  );
}

/// Closing hint pointing at the build tool.
pub fn final_hints() {
  println!("\nNow you can execute:");
  println!("\tbuck fetch //lib/...");
  println!("\tbuck build //...");
}
