/*!
pengviz Command Line Interface

Evaluates the dashboard's derived views from the terminal: summary texts,
chart specifications, the table projection and the correlation heatmap,
for a given dataset and parameter state.
*/

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use pengviz::dataset::{load_csv, sample_dataset, Island, Sex, Species};
use pengviz::view::chart::ChartTarget;
use pengviz::{Dashboard, Dataset, ParamSchema, Parameters, PengvizError, VERSION};

#[derive(Parser)]
#[command(name = "pengviz")]
#[command(about = "Reactive penguin dashboard core")]
#[command(version = VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the count and the three statistic value boxes
    Summary {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print a chart rendering as Vega-Lite JSON
    Chart {
        /// Which rendering: image or widget
        #[arg(long, default_value = "widget")]
        target: String,

        /// Output file path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print the data table projection as JSON
    Table {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print the correlation heatmap as Vega-Lite JSON
    Heatmap {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print the declared parameter schema as JSON
    Schema {
        /// Parameter surface: full or mass-only
        #[arg(long, default_value = "full")]
        variant: String,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// CSV dataset path (built-in sample data when omitted)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Parameter surface: full or mass-only
    #[arg(long, default_value = "full")]
    variant: String,

    /// Plot type (Scatterplot or Histogram)
    #[arg(long, default_value = "Scatterplot")]
    plot_type: String,

    /// X-axis field (all plots)
    #[arg(long, default_value = "bill_length_mm")]
    x_field: String,

    /// Scatterplot y-axis field
    #[arg(long, default_value = "bill_depth_mm")]
    y_field: String,

    /// Hue field (sex, species or island)
    #[arg(long, default_value = "species")]
    hue: String,

    /// Histogram bin count
    #[arg(long, default_value_t = 20)]
    bins: u32,

    /// Disable all filtering (identity filter)
    #[arg(long)]
    no_filter: bool,

    /// Body mass range lower bound (g)
    #[arg(long)]
    mass_min: Option<f64>,

    /// Body mass range upper bound (g)
    #[arg(long)]
    mass_max: Option<f64>,

    /// Keep only these species (repeatable; all when omitted)
    #[arg(long)]
    species: Vec<String>,

    /// Keep only these islands (repeatable; all when omitted)
    #[arg(long)]
    island: Vec<String>,

    /// Keep only these sexes (repeatable; both when omitted)
    #[arg(long)]
    sex: Vec<String>,

    /// Render the table as a read-only table instead of a grid
    #[arg(long)]
    show_table: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { common } => {
            let dash = build_dashboard(&common)?;
            let out = dash.outputs();
            println!("{}", out.count_text);
            println!("{}", out.stat_first);
            println!("{}", out.stat_second);
            println!("{}", out.stat_third);
        }
        Commands::Chart {
            target,
            output,
            common,
        } => {
            let dash = build_dashboard(&common)?;
            let target = match target.as_str() {
                "image" => ChartTarget::Image,
                "widget" => ChartTarget::Widget,
                other => anyhow::bail!("Unknown chart target: '{}' (image, widget)", other),
            };
            let spec = match target {
                ChartTarget::Image => &dash.outputs().image_chart,
                ChartTarget::Widget => &dash.outputs().widget_chart,
            };
            emit(serde_json::to_string_pretty(spec)?, output)?;
        }
        Commands::Table { common } => {
            let dash = build_dashboard(&common)?;
            println!("{}", serde_json::to_string_pretty(&dash.outputs().table)?);
        }
        Commands::Heatmap { common } => {
            let dash = build_dashboard(&common)?;
            println!("{}", serde_json::to_string_pretty(&dash.outputs().heatmap)?);
        }
        Commands::Schema { variant } => {
            let schema = parse_variant(&variant)?;
            println!("{}", serde_json::to_string_pretty(&schema.defs())?);
        }
    }

    Ok(())
}

fn emit(text: String, output: Option<PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(&path, text)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?,
        None => println!("{}", text),
    }
    Ok(())
}

fn parse_variant(variant: &str) -> anyhow::Result<ParamSchema> {
    match variant {
        "full" => Ok(ParamSchema::with_bill_filters()),
        "mass-only" => Ok(ParamSchema::mass_only()),
        other => anyhow::bail!("Unknown variant: '{}' (full, mass-only)", other),
    }
}

fn load_dataset(path: &Option<PathBuf>) -> anyhow::Result<Dataset> {
    match path {
        Some(path) => Ok(load_csv(path)?),
        None => Ok(sample_dataset()),
    }
}

fn build_dashboard(common: &CommonArgs) -> anyhow::Result<Dashboard> {
    let schema = parse_variant(&common.variant)?;
    let dataset = load_dataset(&common.data)?;
    let params = build_params(&schema, common)?;
    let mut dash = Dashboard::new(dataset, schema)?;
    dash.update(params)?;
    Ok(dash)
}

fn build_params(schema: &ParamSchema, common: &CommonArgs) -> anyhow::Result<Parameters> {
    let mut params = schema.defaults();

    params.plot_type = common.plot_type.parse().map_err(PengvizError::ParamError)?;
    params.x_field = common.x_field.parse().map_err(PengvizError::ParamError)?;
    params.y_field = common.y_field.parse().map_err(PengvizError::ParamError)?;
    params.hue_field = common.hue.parse().map_err(PengvizError::ParamError)?;
    params.bin_count = common.bins;
    params.filter_enabled = !common.no_filter;
    params.show_table = common.show_table;

    if let Some(min) = common.mass_min {
        params.mass_range.0 = min;
    }
    if let Some(max) = common.mass_max {
        params.mass_range.1 = max;
    }
    if !common.species.is_empty() {
        params.species_set = parse_set::<Species>(&common.species)?;
    }
    if !common.island.is_empty() {
        params.island_set = parse_set::<Island>(&common.island)?;
    }
    if !common.sex.is_empty() {
        params.sex_set = parse_set::<Sex>(&common.sex)?;
    }

    params.validate(schema)?;
    Ok(params)
}

fn parse_set<T>(values: &[String]) -> anyhow::Result<std::collections::BTreeSet<T>>
where
    T: std::str::FromStr<Err = String> + Ord,
{
    values
        .iter()
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| anyhow::anyhow!(PengvizError::ParamError(e)))
        })
        .collect()
}
