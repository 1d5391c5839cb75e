mod cli;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use textify::output::{console_preview, force_size, save_image, write_text};
use textify::processor::{open_image, textify_image_with_rng};
use textify::render_text;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configure logging
    env_logger::Builder::new()
        .parse_filters(&cli.log_level)
        .format_timestamp(None)
        .init();

    let config = cli.to_config();
    config.validate()?;

    let img = open_image(&cli.image)?;

    let mut rng: Box<dyn RngCore> = match cli.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };
    let art = textify_image_with_rng(&img, &config, &mut *rng)?;
    drop(img);

    println!("{}", console_preview(art.as_str(), config.size));

    if let Some(path) = &config.output_text {
        log::info!("Making Text File");
        write_text(path, art.as_str())
            .with_context(|| format!("failed to save text to {}", path.display()))?;
    }

    if let Some(path) = &config.output_image {
        log::info!("Making Image File");
        let mut rendered = render_text(art.as_str(), &config.render_options())?;
        if let Some((width, height)) = config.image_size {
            rendered = force_size(&rendered, width, height);
        }
        save_image(path, &rendered)
            .with_context(|| format!("failed to save image to {}", path.display()))?;
    }

    Ok(())
}
