//! Sykli CI pipeline for alive
//!
//! Run locally: sykli run
//! Or: cargo run --bin sykli --features sykli -- --emit | sykli run -

use sykli::{Condition, Pipeline, Template};

fn main() {
    let mut p = Pipeline::new();

    // === RESOURCES ===
    let src = p.dir(".");
    let cargo_registry = p.cache("cargo-registry");
    let cargo_git = p.cache("cargo-git");
    let target_cache = p.cache("target");

    // === TEMPLATE ===
    let rust = Template::new()
        .container("rust:1.85")
        .mount_dir(&src, "/src")
        .mount_cache(&cargo_registry, "/usr/local/cargo/registry")
        .mount_cache(&cargo_git, "/usr/local/cargo/git")
        .mount_cache(&target_cache, "/src/target")
        .workdir("/src");

    // === TASKS ===

    let _ = p
        .task("test")
        .from(&rust)
        .run("cargo test")
        .inputs(&["**/*.rs", "Cargo.toml", "Cargo.lock"]);

    let _ = p
        .task("lint")
        .from(&rust)
        .run("cargo clippy --all-targets -- -D warnings")
        .inputs(&["**/*.rs", "Cargo.toml", "Cargo.lock"]);

    let _ = p
        .task("fmt")
        .from(&rust)
        .run("cargo fmt -- --check")
        .inputs(&["**/*.rs"]);

    let _ = p
        .task("build")
        .from(&rust)
        .run("cargo build --release --bin alive")
        .inputs(&["**/*.rs", "Cargo.toml", "Cargo.lock"])
        .output("binary", "target/release/alive")
        .after(&["test", "lint", "fmt"]);

    // Smoke test: serve, poll our own listener, drain on SIGTERM
    let _ = p
        .task("smoke-test")
        .from(&rust)
        .run(
            r#"#!/bin/bash
set -e

ALIVE_SELF=http://127.0.0.1:8001/healthz RUST_LOG=info ./target/release/alive > /tmp/alive-log.txt 2>&1 &
ALIVE_PID=$!
sleep 7

BODY=$(curl -sf http://127.0.0.1:8001/)
if [ "$BODY" != "Hello World" ]; then
  echo "ERROR: unexpected body: $BODY"
  cat /tmp/alive-log.txt
  exit 1
fi

if ! grep -q "Fetched URL" /tmp/alive-log.txt; then
  echo "ERROR: no polling batch ran"
  cat /tmp/alive-log.txt
  exit 1
fi

kill -TERM $ALIVE_PID
wait $ALIVE_PID

if ! grep -q "Server gracefully stopped" /tmp/alive-log.txt; then
  echo "ERROR: did not shut down gracefully"
  cat /tmp/alive-log.txt
  exit 1
fi

echo "Smoke test passed"
"#,
        )
        .input_from("build", "binary", "/src/target/release/alive")
        .when_cond(Condition::event("push").or(Condition::negate(Condition::branch("*"))))
        .timeout(120);

    p.emit();
}
