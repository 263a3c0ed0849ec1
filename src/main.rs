use anyhow::{Context, Result};
use clap::Parser;
use gridroute::{dijkstra_all_with, AdjacencyMatrix, Corner, StreetGrid, Weight};
use tracing::{debug, info, Level};

#[derive(Parser, Debug)]
#[command(name = "grid")]
#[command(about = "Route two travelers across a street grid to a shared destination and work out who should leave later.", long_about = None)]
struct Cli {
    /// Home corner of the first traveler, as AVENUE,STREET
    #[arg(long, default_value = "14,54")]
    first: Corner,

    /// Extra minutes per block for the first traveler
    #[arg(long, default_value_t = 0)]
    first_handicap: Weight,

    /// Home corner of the second traveler, as AVENUE,STREET
    #[arg(long, default_value = "13,52")]
    second: Corner,

    /// Extra minutes per block for the second traveler
    #[arg(long, default_value_t = 2)]
    second_handicap: Weight,

    /// Meeting corner, as AVENUE,STREET
    #[arg(short, long, default_value = "11,54")]
    to: Corner,

    /// Log every expanded corner while searching
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct Trip {
    minutes: Weight,
    route: Vec<Corner>,
}

fn plan_trip(
    grid: &StreetGrid,
    matrix: &AdjacencyMatrix,
    from: Corner,
    to: Corner,
    handicap: Weight,
    trace: bool,
) -> Result<Trip> {
    let source = grid.node_of(from).with_context(|| format!("start corner {from}"))?;
    let target = grid.node_of(to).with_context(|| format!("destination corner {to}"))?;

    let table = dijkstra_all_with(source, matrix, handicap, |node, next| {
        if !trace {
            return;
        }
        match (grid.corner_of(node), next.and_then(|n| grid.corner_of(n).ok())) {
            (Ok(here), Some(next)) => info!(%here, %next, "expanded"),
            (Ok(here), None) => info!(%here, "expanded, search done"),
            _ => {}
        }
    })?;

    let minutes = table
        .distance(target)?
        .with_context(|| format!("{to} cannot be reached from {from}"))?;
    let route = grid.corners_of(&table.path_to(target)?)?;
    debug!(%from, %to, minutes, blocks = route.len() - 1, "trip planned");

    Ok(Trip { minutes, route })
}

fn departure_advice(first: Weight, second: Weight) -> String {
    if first < second {
        format!("The first traveler should leave {} minutes after the second", second - first)
    } else if second < first {
        format!("The second traveler should leave {} minutes after the first", first - second)
    } else {
        String::from("Both travelers should leave at the same time")
    }
}

fn format_route(route: &[Corner]) -> String {
    route.iter().map(Corner::to_string).collect::<Vec<_>>().join(" -> ")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let grid = StreetGrid::chapinero();
    let matrix = grid.build_matrix()?;

    let first = plan_trip(&grid, &matrix, cli.first, cli.to, cli.first_handicap, cli.trace)?;
    let second = plan_trip(&grid, &matrix, cli.second, cli.to, cli.second_handicap, cli.trace)?;

    println!("First traveler:  {} min via {}", first.minutes, format_route(&first.route));
    println!("Second traveler: {} min via {}", second.minutes, format_route(&second.route));

    println!("{}", departure_advice(first.minutes, second.minutes));

    Ok(())
}
