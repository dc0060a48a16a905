//! Cross-validation against an external canonical labeling tool.
//!
//! A family over `0..n` is rendered as a vertex-colored bipartite incidence
//! graph: one vertex per member set (`0..m`), one vertex per element
//! (`m..m+n`), and an edge between set `s` and element `e` iff `e ∈ s`. Two
//! families are isomorphic under relabeling of the ground set iff their
//! incidence graphs are isomorphic by a color-preserving map, so the canonical
//! graph computed by nauty's `dreadnaut` is an independent certificate.
//!
//! # Script Format
//!
//! For `{∅, {0}, {1}, {0,1}}` over two elements:
//!
//! ```text
//! -a -m
//! l=0
//! n=6 g
//! 1: 4;
//! 2: 5;
//! 3: 4 5;
//! .
//! f=[0:3 | 4:5]
//! c x b
//! q
//! ```
//!
//! The oracle is a cross-check only. Failing to run it (missing binary, time
//! out, garbage output) is reported as an [`OracleError`] and never changes
//! which families the brute-force canonicalizer keeps.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::antichain::Antichain;
use crate::family::Family;
use crate::mask::contains;

/// Error raised by an oracle invocation.
#[derive(Debug)]
pub enum OracleError {
    /// The tool could not be started or talked to.
    Spawn(io::Error),
    /// The tool did not finish in time.
    Timeout(Duration),
    /// The tool exited unsuccessfully.
    ExitStatus { code: Option<i32>, stderr: String },
    /// The tool's output could not be understood.
    Parse(String),
    /// The input script could not be rendered.
    Render(fmt::Error),
}

impl From<io::Error> for OracleError {
    fn from(e: io::Error) -> Self {
        OracleError::Spawn(e)
    }
}

impl From<fmt::Error> for OracleError {
    fn from(e: fmt::Error) -> Self {
        OracleError::Render(e)
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::Spawn(e) => write!(f, "Oracle unavailable: {}", e),
            OracleError::Timeout(t) => write!(f, "Oracle unavailable: timed out after {:?}", t),
            OracleError::ExitStatus { code, stderr } => match code {
                Some(code) => write!(f, "Oracle unavailable: exited with code {}: {}", code, stderr.trim()),
                None => write!(f, "Oracle unavailable: killed by signal: {}", stderr.trim()),
            },
            OracleError::Parse(msg) => write!(f, "Oracle unavailable: unparseable output: {}", msg),
            OracleError::Render(e) => write!(f, "Oracle unavailable: cannot render script: {}", e),
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OracleError::Spawn(e) => Some(e),
            OracleError::Render(e) => Some(e),
            _ => None,
        }
    }
}

/// Renders the incidence graph of a family as a `dreadnaut` script that prints
/// the canonical labeling and the canonically labeled graph.
///
/// Output line wrapping is disabled (`l=0`), so every adjacency list of the
/// canonical graph comes back on one line.
pub fn to_dreadnaut(family: &Family, n: usize) -> Result<String, fmt::Error> {
    let masks = family.to_sorted_vec();
    let m = masks.len();
    let total = m + n;

    let mut script = String::new();
    writeln!(script, "-a -m")?;
    writeln!(script, "l=0")?;
    writeln!(script, "n={} g", total)?;
    for (s, &mask) in masks.iter().enumerate() {
        let neighbours: Vec<String> = (0..n).filter(|&e| contains(mask, e)).map(|e| (m + e).to_string()).collect();
        if !neighbours.is_empty() {
            writeln!(script, "{}: {};", s, neighbours.join(" "))?;
        }
    }
    writeln!(script, ".")?;

    let cells: Vec<String> = [(0, m), (m, total)]
        .into_iter()
        .filter(|&(lo, hi)| lo < hi)
        .map(|(lo, hi)| {
            if hi - lo == 1 {
                lo.to_string()
            } else {
                format!("{}:{}", lo, hi - 1)
            }
        })
        .collect();
    writeln!(script, "f=[{}]", cells.join(" | "))?;
    writeln!(script, "c x b")?;
    writeln!(script, "q")?;
    Ok(script)
}

/// Canonical labeling and canonical graph reported by the oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleCertificate {
    /// `labeling[k]` is the original vertex placed at canonical position `k`
    pub labeling: Vec<usize>,
    /// Adjacency lists of the canonically labeled graph
    pub graph: Vec<Vec<usize>>,
    /// Order of the automorphism group, if reported
    pub group_size: Option<f64>,
}

impl OracleCertificate {
    /// The isomorphism-invariant part: equal for isomorphic inputs.
    pub fn key(&self) -> &[Vec<usize>] {
        &self.graph
    }
}

fn parse_usize_tokens(line: &str) -> Option<Vec<usize>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }
    tokens.iter().map(|t| t.parse().ok()).collect()
}

fn unterminated(v: usize) -> OracleError {
    OracleError::Parse(format!("adjacency of vertex {} is not terminated by ';'", v))
}

/// Records the adjacency list of `v` if `body` is terminated, otherwise hands
/// it back as still open.
fn store_adjacency(
    graph: &mut [Option<Vec<usize>>],
    v: usize,
    body: String,
) -> Result<Option<(usize, String)>, OracleError> {
    let Some(list) = body.trim_end().strip_suffix(';') else {
        return Ok(Some((v, body)));
    };
    let mut neighbours = match list.trim() {
        "" => Vec::new(),
        t => parse_usize_tokens(t).ok_or_else(|| OracleError::Parse(format!("bad adjacency of vertex {}: {:?}", v, t)))?,
    };
    neighbours.sort_unstable();
    graph[v] = Some(neighbours);
    Ok(None)
}

/// Parses the output of the script produced by [`to_dreadnaut`] for a graph on
/// `total` vertices.
///
/// An adjacency list may be wrapped over several lines; it ends at its `;`.
pub fn parse_dreadnaut_output(output: &str, total: usize) -> Result<OracleCertificate, OracleError> {
    let mut group_size = None;
    let mut labeling = Vec::new();
    let mut graph: Vec<Option<Vec<usize>>> = vec![None; total];
    // Vertex whose adjacency list is still open, with the text collected so far
    let mut open: Option<(usize, String)> = None;

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((v, mut body)) = open.take() {
            if line.contains(':') {
                return Err(unterminated(v));
            }
            body.push(' ');
            body.push_str(line);
            open = store_adjacency(&mut graph, v, body)?;
            continue;
        }

        if let Some(rest) = line.split(';').find_map(|part| part.trim().strip_prefix("grpsize=")) {
            group_size = rest.trim().parse::<f64>().ok();
            continue;
        }

        if let Some((head, tail)) = line.split_once(':') {
            // Canonical graph line, `v : u w;`, only once the labeling is complete
            if labeling.len() < total {
                continue;
            }
            let v: usize = match head.trim().parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            if v >= total {
                return Err(OracleError::Parse(format!("vertex {} out of range in line {:?}", v, line)));
            }
            open = store_adjacency(&mut graph, v, tail.trim().to_string())?;
            continue;
        }

        if labeling.len() < total {
            if let Some(values) = parse_usize_tokens(line) {
                labeling.extend(values);
            }
        }
    }

    if let Some((v, _)) = open {
        return Err(unterminated(v));
    }

    if labeling.len() != total {
        return Err(OracleError::Parse(format!(
            "expected a labeling of {} vertices, found {}",
            total,
            labeling.len()
        )));
    }
    let mut hit = vec![false; total];
    for &v in &labeling {
        if v >= total || hit[v] {
            return Err(OracleError::Parse(format!("labeling {:?} is not a permutation", labeling)));
        }
        hit[v] = true;
    }

    let graph = graph
        .into_iter()
        .enumerate()
        .map(|(v, adj)| adj.ok_or_else(|| OracleError::Parse(format!("missing adjacency of vertex {}", v))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OracleCertificate {
        labeling,
        graph,
        group_size,
    })
}

/// Anything able to certify a family up to relabeling of its ground set.
pub trait CanonicalLabeler {
    fn certify(&self, family: &Family, n: usize) -> Result<OracleCertificate, OracleError>;
}

/// Runs nauty's `dreadnaut` as a subprocess.
#[derive(Debug, Clone)]
pub struct Dreadnaut {
    /// Program to run (default: `dreadnaut`, looked up in `PATH`)
    pub program: PathBuf,
    /// Wall-clock limit per invocation (default: 30 seconds)
    pub timeout: Duration,
}

impl Default for Dreadnaut {
    fn default() -> Self {
        Self {
            program: PathBuf::from("dreadnaut"),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Dreadnaut {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Feeds `script` to the program and returns its standard output.
    pub fn execute(&self, script: &str) -> Result<String, OracleError> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(script.as_bytes()) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
            // Dropping stdin closes the pipe
        }

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(OracleError::Timeout(self.timeout));
            }
            thread::sleep(Duration::from_millis(5));
        };

        let stdout = join_reader(stdout)?;
        let stderr = join_reader(stderr)?;

        if !status.success() {
            return Err(OracleError::ExitStatus {
                code: status.code(),
                stderr,
            });
        }
        Ok(stdout)
    }
}

impl CanonicalLabeler for Dreadnaut {
    fn certify(&self, family: &Family, n: usize) -> Result<OracleCertificate, OracleError> {
        let script = to_dreadnaut(family, n)?;
        debug!("Running {:?} on {}", self.program, family);
        let output = self.execute(&script)?;
        parse_dreadnaut_output(&output, family.len() + n)
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> thread::JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        source.read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

fn join_reader(handle: Option<thread::JoinHandle<io::Result<String>>>) -> Result<String, OracleError> {
    match handle {
        None => Ok(String::new()),
        Some(handle) => match handle.join() {
            Ok(result) => Ok(result?),
            Err(_) => Err(OracleError::Spawn(io::Error::new(io::ErrorKind::Other, "output reader panicked"))),
        },
    }
}

/// Outcome of [`cross_check`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrossCheckReport {
    /// Families the oracle certified
    pub certified: usize,
    /// Families for which the oracle was unavailable
    pub unavailable: usize,
    /// Pairs of kept families (by index) the oracle considers isomorphic
    pub disagreements: Vec<(usize, usize)>,
}

impl CrossCheckReport {
    /// True if every family was certified and no two share a certificate.
    pub fn is_consistent(&self) -> bool {
        self.unavailable == 0 && self.disagreements.is_empty()
    }
}

impl fmt::Display for CrossCheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} certified, {} unavailable, {} disagreements",
            self.certified,
            self.unavailable,
            self.disagreements.len()
        )
    }
}

/// Certifies every kept family with `oracle` and reports pairs it considers
/// isomorphic. Oracle failures are logged and counted, never propagated.
pub fn cross_check<L>(families: &[(Antichain, Family)], n: usize, oracle: &L) -> CrossCheckReport
where
    L: CanonicalLabeler + ?Sized,
{
    let mut report = CrossCheckReport::default();
    let mut first_with: HashMap<(usize, Vec<Vec<usize>>), usize> = HashMap::new();

    for (index, (antichain, family)) in families.iter().enumerate() {
        match oracle.certify(family, n) {
            Ok(cert) => {
                report.certified += 1;
                let key = (family.len(), cert.key().to_vec());
                if let Some(&earlier) = first_with.get(&key) {
                    warn!(
                        "Oracle considers family #{} (antichain {}) isomorphic to family #{}",
                        index, antichain, earlier
                    );
                    report.disagreements.push((earlier, index));
                } else {
                    first_with.insert(key, index);
                }
            }
            Err(e) => {
                warn!("Family #{} (antichain {}): {}", index, antichain, e);
                report.unavailable += 1;
            }
        }
    }

    report
}
