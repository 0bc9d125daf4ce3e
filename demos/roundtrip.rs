use iniparser::{Ini, IniOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let mut sample_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    sample_path.push("demos/sample.ini");

    let options = IniOptions {
        preserve_inline_comments: true,
        ..IniOptions::default()
    };
    let mut ini = Ini::load_with_options(&sample_path, options)?;
    println!("✅ Successfully parsed {}\n", sample_path.display());

    println!("key1          = {}", ini.get::<f64>("key1")?);
    println!("section1.key2 = {}", ini.get::<i32>("section1.key2")?);
    println!("section1.key3 = {}", ini.get_string("section1.key3")?);
    println!("section2.key2 = {:?}", ini.get_list("section2.key2")?);

    ini.set("section1.key1", 24)?;
    ini.set("section1.enabled", true)?;
    ini.set_list("section2.key2", &[34.2, 98.0, -293.1, 1e3])?;
    ini.set("section3.greeting", "hello; world")?;

    let out_dir = tempfile::tempdir()?;
    let out_path = out_dir.path().join("sample_modified.ini");
    ini.save_as(&out_path)?;

    println!("\nAfter mutation:\n{}", std::fs::read_to_string(&out_path)?);

    Ok(())
}
