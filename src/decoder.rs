//! Sum-product decoder for LDPC codes

use serde::{Deserialize, Serialize};

use crate::{Bit, Error, ParityCheckMatrix, TannerGraph};

/// Configuration for the sum-product decoder
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct DecoderConfig {
    /// Maximum number of message-passing iterations
    pub max_num_iter: u32,
    /// Saturation bound: every message is clamped to `[-vsat, vsat]` after each update phase
    pub vsat: f64,
}

impl Default for DecoderConfig {
    /// Returns the conventional configuration of 50 iterations with a saturation bound of 100.
    fn default() -> Self {
        Self {
            max_num_iter: 50,
            vsat: 100.0,
        }
    }
}

/// Outcome of a decode call
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DecodeOutcome {
    /// Whether the hard decision reproduced the target syndrome
    pub converged: bool,
    /// Bit decisions at the point the decoder stopped
    pub estimate: Vec<Bit>,
}

/// Per-call message workspace, one value per Tanner graph edge in each direction
#[derive(Debug)]
struct MessageSet {
    /// Variable-to-check messages, indexed by edge id
    msg_v: Vec<f64>,
    /// Check-to-variable messages, indexed by edge id
    msg_c: Vec<f64>,
}

impl MessageSet {
    /// Returns workspace with every variable-to-check message seeded from its variable's LLR.
    fn new(graph: &TannerGraph, llrs: &[f64]) -> Self {
        let mut msg_v = vec![0.0; graph.num_edges];
        for (var, edges) in graph.var_edges.iter().enumerate() {
            for &(_, edge) in edges {
                msg_v[edge] = llrs[var];
            }
        }
        Self {
            msg_v,
            msg_c: vec![0.0; graph.num_edges],
        }
    }
}

/// Decodes a noisy observation against a target syndrome by sum-product message passing.
///
/// Starting from the given per-variable LLR values, the decoder alternates check-node and
/// variable-node updates over the Tanner graph, clamping messages to `[-config.vsat, config.vsat]`
/// after each phase. After every iteration the hard decision is tested against the target
/// syndrome; on a match the decoder reports convergence immediately. A non-finite
/// variable-to-check message stops the decoder with `converged: false`, as does exhausting
/// `config.max_num_iter` iterations. With `config.max_num_iter` of `0`, no update runs and the
/// all-zero estimate is returned with `converged: false`.
///
/// # Parameters
///
/// - `matrix`: Parity-check matrix of the code.
///
/// - `graph`: Tanner graph of `matrix` (built once via [`TannerGraph::new`] and reusable across
///   decode calls).
///
/// - `llrs`: Initial LLR value for each variable, with positive values indicating that `Zero` is
///   more likely.
///
/// - `syndrome`: Target parity pattern, one value per check.
///
/// - `config`: Iteration bound and saturation bound.
///
/// # Errors
///
/// Returns an error if `llrs.len()` is not equal to the number of matrix columns, if
/// `syndrome.len()` is not equal to the number of matrix rows, if `graph` does not have the same
/// dimensions as `matrix`, or if `config.vsat` is not a positive finite number.
///
/// # Examples
///
/// ```
/// use ldpc_bp::{decode, Bit, DecoderConfig, ParityCheckMatrix, TannerGraph};
///
/// let matrix = ParityCheckMatrix::new(
///     3,
///     7,
///     vec![0, 1, 2, 4, 5, 7, 9, 12],
///     vec![0, 1, 0, 1, 2, 0, 2, 1, 2, 0, 1, 2],
/// )?;
/// let graph = TannerGraph::new(&matrix);
/// let llrs = vec![1.5; 7];
/// let syndrome = vec![Bit::Zero; 3];
/// let outcome = decode(&matrix, &graph, &llrs, &syndrome, DecoderConfig::default())?;
/// assert!(outcome.converged);
/// assert_eq!(outcome.estimate, vec![Bit::Zero; 7]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode(
    matrix: &ParityCheckMatrix,
    graph: &TannerGraph,
    llrs: &[f64],
    syndrome: &[Bit],
    config: DecoderConfig,
) -> Result<DecodeOutcome, Error> {
    check_decoder_inputs(matrix, graph, llrs, syndrome, config)?;
    let mut estimate = vec![Bit::Zero; matrix.num_cols()];
    let mut msgs = MessageSet::new(graph, llrs);
    for _ in 0 .. config.max_num_iter {
        check_node_update(&mut msgs, graph, syndrome);
        saturate(&mut msgs.msg_c, config.vsat);
        var_node_update(&mut msgs, graph, llrs);
        saturate(&mut msgs.msg_v, config.vsat);
        hard_decision(&mut estimate, llrs, &msgs, graph);
        if matrix.syndrome(&estimate)? == syndrome {
            return Ok(DecodeOutcome {
                converged: true,
                estimate,
            });
        }
        if has_diverged(&msgs.msg_v) {
            return Ok(DecodeOutcome {
                converged: false,
                estimate,
            });
        }
    }
    Ok(DecodeOutcome {
        converged: false,
        estimate,
    })
}

/// Checks validity of decoder inputs.
fn check_decoder_inputs(
    matrix: &ParityCheckMatrix,
    graph: &TannerGraph,
    llrs: &[f64],
    syndrome: &[Bit],
    config: DecoderConfig,
) -> Result<(), Error> {
    if llrs.len() != matrix.num_cols() {
        return Err(Error::InvalidInput(format!(
            "Invalid LLR vector length (expected {}, found {})",
            matrix.num_cols(),
            llrs.len()
        )));
    }
    if syndrome.len() != matrix.num_rows() {
        return Err(Error::InvalidInput(format!(
            "Invalid syndrome length (expected {}, found {})",
            matrix.num_rows(),
            syndrome.len()
        )));
    }
    if graph.num_checks() != matrix.num_rows() || graph.num_variables() != matrix.num_cols() {
        return Err(Error::InvalidInput(format!(
            "Tanner graph dimensions ({}, {}) do not match matrix dimensions ({}, {})",
            graph.num_checks(),
            graph.num_variables(),
            matrix.num_rows(),
            matrix.num_cols()
        )));
    }
    if !(config.vsat.is_finite() && config.vsat > 0.0) {
        return Err(Error::InvalidInput(format!(
            "Saturation bound must be a positive finite number (found {})",
            config.vsat
        )));
    }
    Ok(())
}

/// Computes the outgoing check-to-variable message on every edge.
///
/// For each check, the message to an incident variable is the product of the tanh-halved incoming
/// messages on all *other* edges, with the check's syndrome bit flipping the overall sign,
/// converted back to the log domain. The per-edge exclusion normally happens by dividing the full
/// product by the edge's own factor; when that factor is exactly zero the product over the other
/// edges is recomputed directly.
fn check_node_update(msgs: &mut MessageSet, graph: &TannerGraph, syndrome: &[Bit]) {
    for (check, edges) in graph.check_edges.iter().enumerate() {
        let sign = match syndrome[check] {
            Bit::Zero => 1.0,
            Bit::One => -1.0,
        };
        let mc_prod = sign
            * edges
                .iter()
                .map(|&(_, edge)| (0.5 * msgs.msg_v[edge]).tanh())
                .product::<f64>();
        for &(_, edge) in edges {
            let own_factor = (0.5 * msgs.msg_v[edge]).tanh();
            let msg_part = if own_factor == 0.0 {
                sign * edges
                    .iter()
                    .filter(|&&(_, other)| other != edge)
                    .map(|&(_, other)| (0.5 * msgs.msg_v[other]).tanh())
                    .product::<f64>()
            } else {
                mc_prod / own_factor
            };
            msgs.msg_c[edge] = ((1.0 + msg_part) / (1.0 - msg_part)).ln();
        }
    }
}

/// Computes the outgoing variable-to-check message on every edge.
///
/// For each variable, the message to an incident check is the variable's LLR plus the sum of all
/// incoming check messages except the one received from that same check.
fn var_node_update(msgs: &mut MessageSet, graph: &TannerGraph, llrs: &[f64]) {
    for (var, edges) in graph.var_edges.iter().enumerate() {
        let total = llrs[var]
            + edges
                .iter()
                .map(|&(_, edge)| msgs.msg_c[edge])
                .sum::<f64>();
        for &(_, edge) in edges {
            msgs.msg_v[edge] = total - msgs.msg_c[edge];
        }
    }
}

/// Clamps every message to `[-vsat, vsat]`.
///
/// NaN values pass through unchanged; the divergence check picks them up at the end of the
/// iteration.
fn saturate(messages: &mut [f64], vsat: f64) {
    for msg in messages.iter_mut() {
        if *msg > vsat {
            *msg = vsat;
        } else if *msg < -vsat {
            *msg = -vsat;
        }
    }
}

/// Writes the current most likely bit of every variable into `estimate`.
fn hard_decision(estimate: &mut [Bit], llrs: &[f64], msgs: &MessageSet, graph: &TannerGraph) {
    for (var, edges) in graph.var_edges.iter().enumerate() {
        let total = llrs[var]
            + edges
                .iter()
                .map(|&(_, edge)| msgs.msg_c[edge])
                .sum::<f64>();
        estimate[var] = if total < 0.0 { Bit::One } else { Bit::Zero };
    }
}

/// Returns `true` if any variable-to-check message is not a finite number.
fn has_diverged(msg_v: &[f64]) -> bool {
    msg_v.iter().any(|msg| !msg.is_finite())
}
