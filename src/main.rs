fn main() {
    if let Err(err) = svg2dxf::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
