#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::Context as _;
    use clap::Parser;
    use minecart::{
        cart::{Palette, build_cart},
        config::ViewerConfig,
        export, flow, viewer,
    };

    /// Procedural low-poly minecart viewer with glTF export.
    #[derive(Parser, Debug)]
    #[command(version, about)]
    struct Args {
        /// Seed of the rock scatter; random when omitted.
        #[arg(long, env = "MINECART_SEED")]
        seed: Option<u64>,

        /// Directory exported glTF files are written to.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Write the glTF file and exit without opening a window.
        #[arg(long)]
        export_only: bool,
    }

    pub fn main() -> anyhow::Result<()> {
        let args = Args::parse();
        let config = ViewerConfig {
            seed: args.seed,
            out_dir: args.out_dir,
            ..ViewerConfig::default()
        };

        if args.export_only {
            if let Err(e) = env_logger::try_init() {
                println!("Warning: Could not initialize logger: {}", e);
            }
            return export_only(config);
        }
        flow::run(vec![viewer::viewer(config)])
    }

    fn export_only(config: ViewerConfig) -> anyhow::Result<()> {
        let mut rng = config.rng();
        let cart = build_cart(&Palette::default(), &mut rng);
        let document = export::to_gltf_string(&cart)?;
        let runtime = tokio::runtime::Runtime::new().context("failed to start the runtime")?;
        let path = runtime.block_on(export::deliver(
            document,
            config.out_dir,
            &config.export_file_name,
        ))?;
        println!("{}", path.display());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

// The web build starts from the library's wasm entry point.
#[cfg(target_arch = "wasm32")]
fn main() {}
