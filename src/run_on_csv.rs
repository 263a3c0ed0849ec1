use anyhow::{Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, Writer};
use gridroute::{dijkstra_all, AdjacencyMatrix, DistanceTable, Node, Weight, MAX_NODES};
use std::fs::File;
use std::io;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "csv")]
#[command(about = "Build a graph from a CSV with node_id, neighbor_id and weight per row and run Dijkstra from a source node id.", long_about = None)]
struct Cli {
    /// Path to the .csv file
    #[arg(short, long)]
    csv: String,

    /// Source node id to run from
    #[arg(short, long)]
    source: Node,

    /// Print the route and distance to this node instead of a summary
    #[arg(short, long)]
    target: Option<Node>,

    /// Extra cost added to every positive-weight edge
    #[arg(long, default_value_t = 0)]
    handicap: Weight,

    /// Output CSV (node_id, distance, path). If omitted, prints to stdout.
    #[arg(short, long)]
    out: Option<String>,

    /// Include unreachable nodes in output with infinite distance
    #[arg(long, default_value_t = false)]
    include_unreachable: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_edges(path: &str) -> Result<Vec<(Node, Node, Weight)>> {
    let file = File::open(path).with_context(|| format!("opening {path}"))?;
    parse_edges(file).with_context(|| format!("reading {path}"))
}

/// Parses `node_id,neighbor_id,weight` rows after a header line.
fn parse_edges<R: io::Read>(input: R) -> Result<Vec<(Node, Node, Weight)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut edges = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let row = line + 1;
        let record = result?;
        let field = |i: usize| {
            record
                .get(i)
                .with_context(|| format!("row {row}: missing column {}", i + 1))
        };
        let node_id: Node = field(0)?.parse().with_context(|| format!("row {row}: node_id"))?;
        let neighbor_id: Node = field(1)?
            .parse()
            .with_context(|| format!("row {row}: neighbor_id"))?;
        let weight: Weight = field(2)?.parse().with_context(|| format!("row {row}: weight"))?;
        edges.push((node_id, neighbor_id, weight));
    }

    Ok(edges)
}

/// Sizes the matrix from the largest node id.
fn build_matrix(edges: &[(Node, Node, Weight)]) -> Result<AdjacencyMatrix> {
    let n = edges
        .iter()
        .map(|&(u, v, _)| u.max(v).saturating_add(1))
        .max()
        .unwrap_or(0);
    AdjacencyMatrix::from_edges(n, edges)
        .with_context(|| format!("building a {n} node matrix (at most {MAX_NODES} nodes)"))
}

fn format_path(path: &[Node]) -> String {
    path.iter().map(Node::to_string).collect::<Vec<_>>().join(" ")
}

/// `[node_id, distance, path]` rows: reachable nodes by distance, then
/// unreachable ones as `inf` when requested.
fn table_rows(table: &DistanceTable, include_unreachable: bool) -> Result<Vec<[String; 3]>> {
    let mut nodes: Vec<(Node, Option<Weight>)> = table
        .entries()
        .iter()
        .enumerate()
        .map(|(node, entry)| (node, entry.distance))
        .collect();
    nodes.sort_by_key(|&(node, d)| (d.is_none(), d, node));

    let mut rows = Vec::new();
    for (node, distance) in nodes {
        match distance {
            Some(d) => {
                let path = table.path_to(node)?;
                rows.push([node.to_string(), d.to_string(), format_path(&path)]);
            }
            None if include_unreachable => {
                rows.push([node.to_string(), String::from("inf"), String::new()]);
            }
            None => {}
        }
    }
    Ok(rows)
}

fn write_rows<W: io::Write>(wtr: &mut Writer<W>, rows: &[[String; 3]]) -> Result<()> {
    wtr.write_record(["node_id", "distance", "path"])?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_table(table: &DistanceTable, out_path: &str, include_unreachable: bool) -> Result<()> {
    let mut wtr = Writer::from_path(out_path).with_context(|| format!("creating CSV {out_path}"))?;
    let rows = table_rows(table, include_unreachable)?;
    write_rows(&mut wtr, &rows)?;

    println!("Wrote distances for {} nodes to {out_path}", rows.len());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let edges = read_edges(&cli.csv)?;
    let matrix = build_matrix(&edges)?;
    info!(nodes = matrix.len(), edges = edges.len(), "graph loaded");

    let table = dijkstra_all(cli.source, &matrix, cli.handicap)
        .with_context(|| format!("running from source {}", cli.source))?;

    if let Some(out_path) = cli.out {
        write_table(&table, &out_path, cli.include_unreachable)?;
    } else if let Some(target) = cli.target {
        match table.distance(target)? {
            Some(d) => {
                println!("Distance from {} to {target}: {d}", cli.source);
                println!("Path: {}", format_path(&table.path_to(target)?));
            }
            None => println!("{target} is unreachable from {}", cli.source),
        }
    } else {
        let reachable = table.settled_count();
        println!("Nodes: {}", table.len());
        println!("Reachable from {}: {}", cli.source, reachable);
        if let Some(maxd) = table.entries().iter().filter_map(|e| e.distance).max() {
            println!("Max finite distance: {maxd}");
        }
    }

    Ok(())
}
