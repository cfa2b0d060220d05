//! The `rights` command: list known usage rights and the default sets
//! for specialized license types.

use cloak_core::rights;

pub fn run() {
    println!("Usage rights:");
    for right in rights::all() {
        println!("  {right}");
    }
    println!();
    println!(
        "Do-not-forward default set: {}",
        rights::do_not_forward_defaults().join(", ")
    );
    println!(
        "Encrypt-only default set: {}",
        rights::encrypt_only_defaults().join(", ")
    );
}
