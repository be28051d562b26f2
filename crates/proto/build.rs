//! Compiles the catalog service and sibling client contracts.
//! `protox` parses the `.proto` files in-process, so no `protoc` install is needed.

const PROTOS: &[&str] = &["proto/catalog.proto", "proto/coach.proto", "proto/abonement.proto"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fds = protox::compile(PROTOS, ["proto"])?;
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_fds(fds)?;
    for proto in PROTOS {
        println!("cargo:rerun-if-changed={proto}");
    }
    Ok(())
}
