// vim: tw=80
//! Generate mocks of this crate's own types, with every strategy.

use std::{env, error::Error, fmt::Write, fs, path::PathBuf};

use seqmock_gen::{
    GenConfig,
    MockTarget,
    SourcePackage,
    Strategy,
    generate_all
};

const TARGETS: &[&str] = &["Ledger", "Notifier"];

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/lib.rs");

    let out = PathBuf::from(env::var("OUT_DIR")?);
    let src = fs::read_to_string("src/lib.rs")?;
    let pkg = SourcePackage::parse("seqmock_tests", &src)?;
    let cfg = GenConfig{mock_suffix: true, ..Default::default()};
    let targets = TARGETS.iter()
        .map(|t| MockTarget::new(*t))
        .collect::<Vec<_>>();

    // The generated files begin with inner attributes, which include! can't
    // handle, so each one becomes a module of its own.
    let mut mods = String::new();
    for revision in 1..=3 {
        let strategy = Strategy::from_revision(revision)?;
        let name = format!("rev{}", revision);
        let dir = out.join(&name);
        fs::create_dir_all(&dir)?;
        let mut files = Vec::new();
        generate_all(&cfg, strategy, &name, &targets, &pkg, |mock| {
            fs::write(dir.join(&mock.filename), &mock.source)?;
            files.push(mock.filename);
            Ok(())
        })?;
        writeln!(mods, "#[cfg(feature = \"{}\")]", cfg.tag)?;
        writeln!(mods, "pub mod {} {{", name)?;
        // Types of the mocked signatures, for the mocks' own `use super::*`
        writeln!(mods, "    #[allow(unused_imports)]")?;
        writeln!(mods, "    use super::*;")?;
        for file in files {
            let module = file.trim_end_matches(".rs");
            writeln!(mods, "    #[path = {:?}]", dir.join(&file).display()
                .to_string())?;
            writeln!(mods, "    mod {};", module)?;
            writeln!(mods, "    pub use self::{}::*;", module)?;
        }
        writeln!(mods, "}}")?;
    }
    fs::write(out.join("mocks.rs"), mods)?;
    Ok(())
}
