mod cli;
mod logging;

use anyhow::Context;
use attack_graph::{
    load_files,
    render::{self, SvgRenderer},
    report::{self, TextReport},
};
use cli::{CommandLine, OutputFormat};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.log_level());

    let model = load_files(&commands.topology, &commands.connections)
        .context("failed to build the attack graph")?;

    match commands.format {
        OutputFormat::Text => print!("{}", TextReport::new(&model).with_color(!commands.no_color)),
        OutputFormat::Json => {
            println!("{}", report::to_json(&model).context("failed to serialize the report")?)
        }
    }

    if let Some(path) = &commands.render {
        let strategy = commands.layout_strategy();
        render::render_to_path(&model, strategy.as_ref(), &SvgRenderer::default(), path)
            .with_context(|| format!("failed to render {}", path.display()))?;
    }

    Ok(())
}
