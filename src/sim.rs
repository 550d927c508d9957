//! Simulator to evaluate frame-error-rate performance over a binary symmetric channel

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    decode, utils, Bsc, DecoderConfig, Error, LlrChannel, ParityCheckMatrix, TannerGraph,
};

/// Parameters for LDPC code simulation over a binary symmetric channel
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimParams {
    /// Crossover probability of the channel
    pub crossover_prob: f64,
    /// Number of frames to be transmitted
    pub num_frames: u32,
    /// Decoder configuration to be used
    pub decoder_config: DecoderConfig,
}

/// Result of LDPC code simulation over a binary symmetric channel
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimResult {
    /// Crossover probability of the channel
    pub crossover_prob: f64,
    /// Number of frames transmitted
    pub num_frames: u32,
    /// Number of frames not recovered exactly
    pub num_frame_errors: u32,
    /// Fraction of frames not recovered exactly
    pub frame_error_rate: f64,
}

/// Runs simulations over a binary symmetric channel for given sets of parameters, and saves the
/// results to a JSON file.
///
/// Each frame draws a random transmit word, computes its syndrome, passes the word through the
/// channel, and decodes the noisy observation against that syndrome; the frame counts as an error
/// unless the decoder's estimate equals the transmitted word. Frames run in parallel, each on its
/// own generator seeded from `rng`, so a given master seed reproduces the same results.
///
/// # Parameters
///
/// - `matrix`: Parity-check matrix of the code.
///
/// - `all_params`: Sets of simulation parameters, one per crossover probability of interest.
///
/// - `rng`: Random number generator to be used.
///
/// - `json_filename`: Name of JSON file to which simulation results must be saved.
///
/// # Errors
///
/// Returns an error if any parameter set is invalid (zero frames, or a crossover probability
/// outside `(0, 1)`), or if the results cannot be written to the JSON file.
pub fn run_bsc_sims<R: Rng + ?Sized>(
    matrix: &ParityCheckMatrix,
    all_params: &[SimParams],
    rng: &mut R,
    json_filename: &str,
) -> Result<Vec<SimResult>, Error> {
    for params in all_params {
        check_sim_params(params)?;
    }
    let graph = TannerGraph::new(matrix);
    let mut all_results = Vec::with_capacity(all_params.len());
    for params in all_params {
        let result = run_bsc_sim(matrix, &graph, params, rng)?;
        eprintln!(
            "p = {:.4}: FER = {:.3e} ({} of {} frames in error)",
            result.crossover_prob,
            result.frame_error_rate,
            result.num_frame_errors,
            result.num_frames
        );
        all_results.push(result);
    }
    serde_json::to_writer_pretty(std::fs::File::create(json_filename)?, &all_results)?;
    eprintln!(
        "(p, FER): {}",
        all_results
            .iter()
            .map(|r| format!("({:.4}, {:.3e})", r.crossover_prob, r.frame_error_rate))
            .join(", ")
    );
    Ok(all_results)
}

/// Checks validity of simulation parameters.
fn check_sim_params(params: &SimParams) -> Result<(), Error> {
    if params.num_frames == 0 {
        return Err(Error::InvalidInput(
            "Number of frames cannot be zero".to_string(),
        ));
    }
    Bsc::new(params.crossover_prob)?;
    Ok(())
}

/// Runs simulation over a binary symmetric channel for a given set of parameters.
#[allow(clippy::cast_possible_truncation)]
fn run_bsc_sim<R: Rng + ?Sized>(
    matrix: &ParityCheckMatrix,
    graph: &TannerGraph,
    params: &SimParams,
    rng: &mut R,
) -> Result<SimResult, Error> {
    let bsc = Bsc::new(params.crossover_prob)?;
    let frame_seeds: Vec<u64> = (0 .. params.num_frames).map(|_| rng.random()).collect();
    let frame_successes: Vec<bool> = frame_seeds
        .par_iter()
        .map(|&seed| run_bsc_frame(matrix, graph, &bsc, params.decoder_config, seed))
        .collect::<Result<_, _>>()?;
    // OK to cast: the error count never exceeds `num_frames`, which is a `u32`.
    let num_frame_errors = frame_successes.iter().filter(|&&success| !success).count() as u32;
    Ok(SimResult {
        crossover_prob: params.crossover_prob,
        num_frames: params.num_frames,
        num_frame_errors,
        frame_error_rate: f64::from(num_frame_errors) / f64::from(params.num_frames),
    })
}

/// Runs a single frame and returns whether the transmitted word was recovered exactly.
fn run_bsc_frame(
    matrix: &ParityCheckMatrix,
    graph: &TannerGraph,
    bsc: &Bsc,
    decoder_config: DecoderConfig,
    seed: u64,
) -> Result<bool, Error> {
    let mut rng = StdRng::seed_from_u64(seed);
    let word = utils::random_bits(matrix.num_cols(), &mut rng);
    let syndrome = matrix.syndrome(&word)?;
    let received = bsc.flip(&word, &mut rng);
    let llrs = bsc.llrs(&received);
    let outcome = decode(matrix, graph, &llrs, &syndrome, decoder_config)?;
    Ok(utils::error_count(&outcome.estimate, &word) == 0)
}

#[cfg(test)]
mod tests_of_functions {
    use super::*;

    fn example_matrix() -> ParityCheckMatrix {
        ParityCheckMatrix::new(
            3,
            7,
            vec![0, 1, 2, 4, 5, 7, 9, 12],
            vec![0, 1, 0, 1, 2, 0, 2, 1, 2, 0, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn test_check_sim_params() {
        // Invalid input
        let params = SimParams {
            crossover_prob: 0.01,
            num_frames: 0,
            decoder_config: DecoderConfig::default(),
        };
        assert!(check_sim_params(&params).is_err());
        let params = SimParams {
            crossover_prob: 0.0,
            num_frames: 100,
            decoder_config: DecoderConfig::default(),
        };
        assert!(check_sim_params(&params).is_err());
        // Valid input
        let params = SimParams {
            crossover_prob: 0.01,
            num_frames: 100,
            decoder_config: DecoderConfig::default(),
        };
        assert!(check_sim_params(&params).is_ok());
    }

    #[test]
    fn test_run_bsc_frame_reproducibility() {
        let matrix = example_matrix();
        let graph = TannerGraph::new(&matrix);
        let bsc = Bsc::new(0.02).unwrap();
        let config = DecoderConfig::default();
        for seed in 0 .. 10 {
            let first = run_bsc_frame(&matrix, &graph, &bsc, config, seed).unwrap();
            let second = run_bsc_frame(&matrix, &graph, &bsc, config, seed).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_run_bsc_sims() {
        let matrix = example_matrix();
        let all_params = [
            SimParams {
                crossover_prob: 0.01,
                num_frames: 20,
                decoder_config: DecoderConfig::default(),
            },
            SimParams {
                crossover_prob: 0.05,
                num_frames: 20,
                decoder_config: DecoderConfig::default(),
            },
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let json_filename = std::env::temp_dir()
            .join("ldpc_bp_sim_results.json")
            .to_string_lossy()
            .into_owned();
        let all_results = run_bsc_sims(&matrix, &all_params, &mut rng, &json_filename).unwrap();
        assert_eq!(all_results.len(), 2);
        for (result, params) in all_results.iter().zip(all_params.iter()) {
            assert_eq!(result.num_frames, params.num_frames);
            assert!(result.num_frame_errors <= result.num_frames);
            assert!((0.0 ..= 1.0).contains(&result.frame_error_rate));
        }
        let contents = std::fs::read_to_string(&json_filename).unwrap();
        let parsed: Vec<SimResult> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), all_results.len());
        std::fs::remove_file(&json_filename).unwrap();
    }
}
