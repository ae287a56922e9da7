use std::process::Command;

const DEMO_DIR: &str = "demos/counter";
const DEMO_WASM: &str = "./target/wasm32-unknown-unknown/debug/hdom_counter.wasm";

fn execute(dir: &str, args: &[&str]) -> Result<(), String> {
    let (cmd, rest) = args.split_first().ok_or("empty command")?;
    let cmd_full = args.join(" ");
    eprintln!("Running '{}'", cmd_full);

    let status = Command::new(cmd)
        .current_dir(dir)
        .args(rest)
        .status()
        .map_err(|err| format!("could not start '{}': {}", cmd_full, err))?;
    if !status.success() {
        return Err(format!("'{}' exited with {}", cmd_full, status));
    }

    eprintln!("Finished: '{}'", cmd_full);
    Ok(())
}

fn demo_build() -> Result<(), String> {
    execute(
        DEMO_DIR,
        &["cargo", "build", "--target", "wasm32-unknown-unknown"],
    )?;
    execute(
        "./",
        &[
            "wasm-bindgen",
            "--target",
            "web",
            "--no-typescript",
            "--out-dir",
            "demos/counter/pkg",
            DEMO_WASM,
        ],
    )
}

fn demo_serve() -> Result<(), String> {
    execute(
        "./",
        &[
            "cargo",
            "watch",
            "-w",
            "demos/counter/src",
            "-w",
            "hdom/src",
            "-s",
            "cargo xtask demo-build",
        ],
    )
}

fn main() {
    let args: Vec<_> = std::env::args().skip(1).collect();
    let arg_refs: Vec<_> = args.iter().map(|x| x.as_str()).collect();

    let result = match arg_refs.as_slice() {
        ["demo-build"] => demo_build(),
        ["demo-serve"] => demo_serve(),
        _ => Err("usage: cargo xtask <demo-build|demo-serve>".to_string()),
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
