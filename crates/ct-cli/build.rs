use std::process::Command;

use chrono::Utc;

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let commit = git_output(&["rev-parse", "--short", "HEAD"]);
    let build_date = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    let tagged = commit.is_some()
        && git_output(&["tag", "--points-at", "HEAD"])
            .is_some_and(|tags| tags.lines().any(|tag| tag.trim() == format!("v{version}")));
    let commit = commit.unwrap_or_else(|| "unknown".to_owned());

    let version_string = if tagged {
        version.to_owned()
    } else {
        format!("{version}+{commit}")
    };

    println!("cargo:rustc-env=CT_VERSION={version_string}");
    println!("cargo:rustc-env=CT_GIT_COMMIT={commit}");
    println!("cargo:rustc-env=CT_BUILD_DATE={build_date}");
}

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;

    if output.status.success() {
        Some(String::from_utf8(output.stdout).ok()?.trim().to_owned())
    } else {
        None
    }
}
