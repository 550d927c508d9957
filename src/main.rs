//! This crate simulates the frame-error-rate-versus-crossover-probability performance of an LDPC
//! code, given by its parity-check matrix, over a binary symmetric channel with sum-product
//! decoding. The parity-check matrix is read from a JSON file, simulation parameters are
//! specified on the command line, and simulation results are saved to a JSON file.
//!
//! Build the executable with `cargo build --release` and then run `./target/release/ldpc-bp -h`
//! for help on the command-line interface.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use anyhow::Result;
use clap::{crate_name, crate_version, value_parser, Arg, ArgMatches, Command};
use ldpc_bp::sim::{self, SimParams};
use ldpc_bp::{DecoderConfig, ParityCheckMatrix};
use std::time::Instant;

/// Main function
fn main() -> Result<()> {
    let timer = Instant::now();
    let mut rng = rand::rng();
    let matches = command_line_parser().get_matches();
    let matrix = ParityCheckMatrix::from_json_file(&matrix_filename_from_matches(&matches))?;
    let json_filename = &json_filename_from_matches(&matches);
    sim::run_bsc_sims(&matrix, &all_sim_params(&matches), &mut rng, json_filename)?;
    eprintln!("Elapsed time: {:.3?}", timer.elapsed());
    Ok(())
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Evaluates the performance of an LDPC code over a binary symmetric channel")
        .arg(matrix_filename())
        .arg(first_crossover_prob())
        .arg(crossover_prob_step())
        .arg(num_crossover_probs())
        .arg(num_frames())
        .arg(max_num_iter())
        .arg(vsat())
        .arg(json_filename())
}

/// Returns argument for name of JSON file holding the parity-check matrix.
fn matrix_filename() -> Arg {
    Arg::new("matrix_filename")
        .short('m')
        .required(true)
        .help("Name of JSON file holding the parity-check matrix in CSC form")
}

/// Returns argument for first crossover probability.
fn first_crossover_prob() -> Arg {
    Arg::new("first_crossover_prob")
        .short('r')
        .value_parser(value_parser!(f64))
        .default_value("0.005")
        .help("First crossover probability")
}

/// Returns argument for crossover probability step.
fn crossover_prob_step() -> Arg {
    Arg::new("crossover_prob_step")
        .short('p')
        .value_parser(value_parser!(f64))
        .default_value("0.0025")
        .help("Crossover probability step")
}

/// Returns argument for number of crossover probabilities.
fn num_crossover_probs() -> Arg {
    Arg::new("num_crossover_probs")
        .short('s')
        .value_parser(value_parser!(u32))
        .default_value("10")
        .help("Number of crossover probabilities")
}

/// Returns argument for number of frames to be transmitted per crossover probability.
fn num_frames() -> Arg {
    Arg::new("num_frames")
        .short('b')
        .value_parser(value_parser!(u32))
        .default_value("1000")
        .help("Number of frames to be transmitted per crossover probability")
}

/// Returns argument for maximum number of decoder iterations.
fn max_num_iter() -> Arg {
    Arg::new("max_num_iter")
        .short('t')
        .value_parser(value_parser!(u32))
        .default_value("50")
        .help("Maximum number of decoder iterations")
}

/// Returns argument for decoder saturation bound.
fn vsat() -> Arg {
    Arg::new("vsat")
        .short('v')
        .value_parser(value_parser!(f64))
        .default_value("100.0")
        .help("Decoder saturation bound for message values")
}

/// Returns argument for name of JSON file to which results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which results must be saved")
}

/// Returns simulation parameters based on command-line arguments.
fn all_sim_params(matches: &ArgMatches) -> Vec<SimParams> {
    let decoder_config = DecoderConfig {
        max_num_iter: max_num_iter_from_matches(matches),
        vsat: vsat_from_matches(matches),
    };
    all_crossover_probs_from_matches(matches)
        .into_iter()
        .map(|crossover_prob| SimParams {
            crossover_prob,
            num_frames: num_frames_from_matches(matches),
            decoder_config,
        })
        .collect()
    // OK to unwrap in the functions called above: All command-line arguments other than the
    // matrix file name have default values, so an error cannot occur.
}

/// Returns name of JSON file holding the parity-check matrix.
fn matrix_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("matrix_filename")
        .unwrap()
        .to_string()
}

/// Returns all crossover probability values.
fn all_crossover_probs_from_matches(matches: &ArgMatches) -> Vec<f64> {
    let first_crossover_prob: f64 = *matches.get_one("first_crossover_prob").unwrap();
    let crossover_prob_step: f64 = *matches.get_one("crossover_prob_step").unwrap();
    let num_crossover_probs: u32 = *matches.get_one("num_crossover_probs").unwrap();
    (0 .. num_crossover_probs)
        .map(|n| first_crossover_prob + crossover_prob_step * f64::from(n))
        .collect()
}

/// Returns number of frames to be transmitted per crossover probability.
fn num_frames_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_frames").unwrap()
}

/// Returns maximum number of decoder iterations.
fn max_num_iter_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("max_num_iter").unwrap()
}

/// Returns decoder saturation bound.
fn vsat_from_matches(matches: &ArgMatches) -> f64 {
    *matches.get_one("vsat").unwrap()
}

/// Returns name of JSON file to which simulation results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .unwrap()
        .to_string()
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    fn command_line_for_test() -> Vec<&'static str> {
        vec![
            crate_name!(),
            "-m",
            "matrix.json",
            "-r",
            "0.01",
            "-p",
            "0.005",
            "-s",
            "4",
            "-b",
            "100",
            "-t",
            "30",
            "-v",
            "80.0",
            "-f",
            "results.json",
        ]
    }

    #[test]
    fn test_command_line_parser() {
        assert!(command_line_parser()
            .try_get_matches_from(command_line_for_test())
            .is_ok());
        // Missing required matrix file name
        assert!(command_line_parser()
            .try_get_matches_from(vec![crate_name!()])
            .is_err());
    }

    #[test]
    fn test_all_sim_params() {
        let matches = command_line_parser().get_matches_from(command_line_for_test());
        assert_eq!(matrix_filename_from_matches(&matches), "matrix.json");
        assert_eq!(json_filename_from_matches(&matches), "results.json");
        let all_params = all_sim_params(&matches);
        let all_crossover_probs = [0.01, 0.015, 0.02, 0.025];
        assert_eq!(all_params.len(), 4);
        for (idx, &params) in all_params.iter().enumerate() {
            assert_float_eq!(
                params.crossover_prob,
                all_crossover_probs[idx],
                abs <= 1e-12
            );
            assert_eq!(params.num_frames, 100);
            assert_eq!(
                params.decoder_config,
                DecoderConfig {
                    max_num_iter: 30,
                    vsat: 80.0
                }
            );
        }
    }
}
