use anyhow::Result;

mod app;

fn main() -> Result<()> {
    let args = explorer_core::cli::parse();
    app::run(args)
}
