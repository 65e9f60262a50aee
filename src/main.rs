use clap::Parser;
use julia_renderer::cli::{
    args::{CommandsEnum, JuliaRendererArgs},
    color_swatch::generate_color_swatch,
    render::render_fractal,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: JuliaRendererArgs = JuliaRendererArgs::parse();

    let result = match &args.command {
        Some(CommandsEnum::Render(params)) => render_fractal(params),
        Some(CommandsEnum::ColorSwatch(params)) => generate_color_swatch(params),
        None => {
            log::warn!("No command specified. Run with `--help` for usage.");
            Ok(())
        }
    };

    if let Err(err) = result {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
