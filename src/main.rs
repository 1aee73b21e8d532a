use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    overture::logging::init_logging()?;

    let site = std::env::args().nth(1).map(PathBuf::from);
    overture::Overture::new(site)?.run()?;
    Ok(())
}
