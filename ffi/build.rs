use std::env;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_version(true)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file("bindings.h");
        }
        // Header generation is best-effort; a parse hiccup must not break
        // the library build itself.
        Err(err) => println!("cargo:warning=failed to generate C header: {err}"),
    }
}
