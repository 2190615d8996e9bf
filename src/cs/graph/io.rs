//! Reading graph files and writing solution and trace files.
//!
//! Graph files start with a `<nodes> <edges>` header. Line `i + 1` lists the
//! neighbors of node `i` (1-indexed), so every edge appears twice. A missing
//! or blank line is a node without neighbors. Counts that disagree with the
//! header are rejected, and so is any non-blank line past the last node.
//!
//! Solution files hold the cover size on the first line and the
//! comma-separated labels on the second. Trace files hold one
//! `elapsed,quality` line per improvement.

use crate::cs::graph::Graph;
use crate::cs::solver::{Algorithm, Solution, Trace};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Parses a graph in adjacency-list format.
pub fn read_graph<R: BufRead>(reader: R) -> Result<Graph> {
    let mut lines = reader.lines();
    let header = lines.next().transpose()?.ok_or_else(|| Error::Parse {
        line: 1,
        message: "missing `<nodes> <edges>` header".to_string(),
    })?;
    let counts = parse_numbers(&header, 1)?;
    let (declared_nodes, declared_edges) = match counts[..] {
        [nodes, edges, ..] => (nodes, edges),
        _ => {
            return Err(Error::Parse {
                line: 1,
                message: format!("expected `<nodes> <edges>`, found `{}`", header.trim()),
            })
        }
    };

    let mut graph = Graph::new();
    for node in 1..=declared_nodes {
        graph.add_node(node)?;
        let line = lines.next().transpose()?.unwrap_or_default();
        for neighbor in parse_numbers(&line, node + 1)? {
            graph.add_edge(node, neighbor)?;
        }
    }

    // Adjacency lines past the declared node count describe extra nodes.
    let mut extra = 0;
    for line in lines {
        if !line?.trim().is_empty() {
            extra += 1;
        }
    }
    if extra > 0 {
        return Err(Error::MalformedGraph {
            what: "node",
            declared: declared_nodes,
            found: declared_nodes + extra,
        });
    }

    if graph.node_count() != declared_nodes {
        return Err(Error::MalformedGraph {
            what: "node",
            declared: declared_nodes,
            found: graph.node_count(),
        });
    }
    if graph.edge_count() != declared_edges {
        return Err(Error::MalformedGraph {
            what: "edge",
            declared: declared_edges,
            found: graph.edge_count(),
        });
    }
    Ok(graph)
}

/// Opens and parses a graph file.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let file = File::open(path)?;
    read_graph(BufReader::new(file))
}

fn parse_numbers(line: &str, line_number: usize) -> Result<Vec<usize>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<usize>().map_err(|e| Error::Parse {
                line: line_number,
                message: format!("`{token}`: {e}"),
            })
        })
        .collect()
}

/// Writes the cover size, then the comma-separated cover.
pub fn write_solution<W: Write>(mut writer: W, solution: &Solution) -> Result<()> {
    writeln!(writer, "{}", solution.cover.len())?;
    let labels: Vec<String> = solution.cover.iter().map(ToString::to_string).collect();
    writeln!(writer, "{}", labels.join(","))?;
    Ok(())
}

/// Writes one `elapsed,quality` line per trace entry.
pub fn write_trace<W: Write>(mut writer: W, trace: &Trace) -> Result<()> {
    for entry in trace {
        writeln!(writer, "{:.2},{}", entry.elapsed, entry.quality)?;
    }
    Ok(())
}

/// Reads back a cover written by [`write_solution`].
pub fn read_solution<R: BufRead>(reader: R) -> Result<Vec<usize>> {
    let mut lines = reader.lines();
    let size_line = lines.next().transpose()?.unwrap_or_default();
    let size: usize = size_line.trim().parse().map_err(|e| Error::Parse {
        line: 1,
        message: format!("cover size `{}`: {e}", size_line.trim()),
    })?;
    let cover_line = lines.next().transpose()?.unwrap_or_default();
    let cover = cover_line
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<usize>().map_err(|e| Error::Parse {
                line: 2,
                message: format!("`{token}`: {e}"),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if cover.len() != size {
        return Err(Error::InvalidInput(format!(
            "solution lists {} nodes but declares {size}",
            cover.len()
        )));
    }
    Ok(cover)
}

/// Reads back a trace written by [`write_trace`].
pub fn read_trace<R: BufRead>(reader: R) -> Result<Trace> {
    let mut trace = Trace::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parse_error = |message: String| Error::Parse {
            line: index + 1,
            message,
        };
        let (elapsed, quality) = line
            .split_once(',')
            .ok_or_else(|| parse_error(format!("expected `elapsed,quality`, found `{line}`")))?;
        let elapsed: f64 = elapsed
            .trim()
            .parse()
            .map_err(|e| parse_error(format!("`{elapsed}`: {e}")))?;
        let quality: usize = quality
            .trim()
            .parse()
            .map_err(|e| parse_error(format!("`{quality}`: {e}")))?;
        trace.record(elapsed, quality);
    }
    Ok(trace)
}

/// File stem `<instance>_<algorithm>_<cutoff>[_<seed>]`; the seed is only
/// part of the name for randomized algorithms.
pub fn output_stem(instance: &Path, algorithm: Algorithm, cutoff_secs: f64, seed: u64) -> String {
    let name = instance
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    if algorithm.is_randomized() {
        format!("{name}_{algorithm}_{cutoff_secs}_{seed}")
    } else {
        format!("{name}_{algorithm}_{cutoff_secs}")
    }
}

/// Tags a stem with a non-default annealing temperature per edge, keeping
/// temperature sweeps apart from default runs.
pub fn temperature_stem(stem: &str, temperature_per_edge: f64) -> String {
    format!("{stem}_T0P{temperature_per_edge}")
}

/// Writes `<stem>.sol` and `<stem>.trace` into `dir` and returns both paths.
pub fn save_solution(dir: &Path, stem: &str, solution: &Solution) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let sol_path = dir.join(format!("{stem}.sol"));
    let trace_path = dir.join(format!("{stem}.trace"));

    let mut sol = BufWriter::new(File::create(&sol_path)?);
    write_solution(&mut sol, solution)?;
    sol.flush()?;

    let mut trace = BufWriter::new(File::create(&trace_path)?);
    write_trace(&mut trace, &solution.trace)?;
    trace.flush()?;

    Ok((sol_path, trace_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::solver::SolveStatus;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const TRIANGLE_WITH_TAIL: &str = "4 4\n2 3\n1 3\n1 2 4\n3\n";

    #[test]
    fn test_read_graph() {
        let graph = read_graph(Cursor::new(TRIANGLE_WITH_TAIL)).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.degree(graph.slot(3).unwrap()), 3);
    }

    #[test]
    fn test_blank_and_missing_lines_are_isolated_nodes() {
        let graph = read_graph(Cursor::new("4 1\n2\n1\n\n")).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree(graph.slot(4).unwrap()), 0);
    }

    #[test]
    fn test_edge_count_mismatch_is_fatal() {
        let err = read_graph(Cursor::new("3 3\n2\n1 3\n2\n")).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGraph {
                what: "edge",
                declared: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_node_count_mismatch_is_fatal() {
        // Node 5 is referenced but the header declares 3 nodes.
        let err = read_graph(Cursor::new("3 2\n2\n1 5\n\n")).unwrap_err();
        assert!(matches!(err, Error::MalformedGraph { what: "node", .. }));
    }

    #[test]
    fn test_lines_past_header_are_fatal() {
        let err = read_graph(Cursor::new("2 1\n2\n1\n1\n")).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGraph {
                what: "node",
                declared: 2,
                found: 3
            }
        ));

        let graph = read_graph(Cursor::new("2 1\n2\n1\n\n  \n")).unwrap();
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_bad_tokens() {
        assert!(matches!(
            read_graph(Cursor::new("")),
            Err(Error::Parse { line: 1, .. })
        ));
        assert!(matches!(
            read_graph(Cursor::new("2 1\n2\nx\n")),
            Err(Error::Parse { line: 3, .. })
        ));
        assert!(matches!(
            read_graph(Cursor::new("2 1\n1\n\n")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_solution_and_trace_files() {
        let mut trace = Trace::new();
        trace.record(0.004, 3);
        trace.record(1.25, 2);
        let solution = Solution {
            cover: vec![1, 3],
            trace,
            status: SolveStatus::Completed,
        };

        let mut sol = Vec::new();
        write_solution(&mut sol, &solution).unwrap();
        assert_eq!(String::from_utf8(sol.clone()).unwrap(), "2\n1,3\n");
        assert_eq!(read_solution(Cursor::new(sol)).unwrap(), vec![1, 3]);

        let mut out = Vec::new();
        write_trace(&mut out, &solution.trace).unwrap();
        assert_eq!(String::from_utf8(out.clone()).unwrap(), "0.00,3\n1.25,2\n");
        let back = read_trace(Cursor::new(out)).unwrap();
        assert_eq!(back.qualities(), vec![3, 2]);
        assert_relative_eq!(back.entries()[1].elapsed, 1.25);
    }

    #[test]
    fn test_solution_size_mismatch() {
        assert!(matches!(
            read_solution(Cursor::new("3\n1,2\n")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_output_stem() {
        let path = Path::new("data/karate.graph");
        assert_eq!(
            output_stem(path, Algorithm::BranchAndBound, 600.0, 1),
            "karate_BnB_600"
        );
        assert_eq!(
            output_stem(path, Algorithm::SimulatedAnnealing, 10.0, 3),
            "karate_LS1_10_3"
        );
        assert_eq!(temperature_stem("karate_LS1_10_3", 50.0), "karate_LS1_10_3_T0P50");
    }
}
