use anyhow::bail;
use clap::Parser;
use millview::cli::{Cli, Commands};
use millview::{commands, init_logging};
use millview_ui::ViewerOptions;
use tracing::{info, Level};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_logging(level)?;
    info!(version = millview::VERSION, built = millview::BUILD_DATE, "MillView starting");

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::View {
            moves,
            tool_diameter,
            style,
        } => {
            let tool_diameter = commands::resolve_tool_diameter(tool_diameter, &config)?;
            let move_list = commands::load_moves(&moves)?;

            let mut options = ViewerOptions::new(move_list.into_inner(), tool_diameter);
            options.assembler = commands::assembler_for(&config, style);
            options.window = config.window.clone();
            options.source_name = moves
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());

            let exit = millview_ui::run(options);
            if exit != millview_ui::ExitCode::SUCCESS {
                bail!("viewer exited with {:?}", exit);
            }
        }
        Commands::Svg {
            moves,
            output,
            tool_diameter,
            pixels_per_mm,
        } => {
            let tool_diameter = commands::resolve_tool_diameter(tool_diameter, &config)?;
            let move_list = commands::load_moves(&moves)?;
            commands::write_svg(&move_list, tool_diameter, pixels_per_mm, &output)?;
        }
        Commands::Stats {
            moves,
            tool_diameter,
        } => {
            let tool_diameter = commands::resolve_tool_diameter(tool_diameter, &config)?;
            let move_list = commands::load_moves(&moves)?;
            let stats = commands::scene_stats(&move_list, tool_diameter, &config);
            println!("{}", commands::stats_report(&stats)?);
        }
    }

    Ok(())
}
