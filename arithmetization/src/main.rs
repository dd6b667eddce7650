//! Builds one of the bundled components over BN254, fills its assignment
//! table, checks it and prints the size of the resulting circuit.
//!
//! ```text
//! RUST_LOG=debug circuit-stats range-check --bits 64 --witness-columns 15
//! circuit-stats linear-check --entries 8 --witness-columns 9
//! ```

use arith_utils::{math::ceil_log2, FieldHelpers};
use arithmetization::{
    components::{
        linear_check::{LinearCheck, LinearCheckInput},
        range_check::{RangeCheck, RangeCheckInput},
    },
    is_satisfied, AssignmentTable, Circuit, Component, ComponentColumns, TableShape, Variable,
};
use ark_bn254::Fr;
use ark_ff::UniformRand;
use itertools::Itertools;
use log::{error, info};
use num_bigint::{BigUint, RandBigInt};
use std::error::Error;

fn report(circuit: &Circuit<Fr>, table: &AssignmentTable<Fr>) {
    let rows = table.rows_amount();
    println!("rows: {rows} (domain 2^{})", ceil_log2(rows.max(1)));
    println!("gates: {}", circuit.gates_amount());
    println!("copy constraints: {}", circuit.copy_constraints().len());
    for gate in circuit.gates() {
        println!(
            "gate {} (degree {}): {}",
            gate.selector,
            gate.degree(),
            gate.constraints.iter().join(", ")
        );
    }
}

fn range_check(
    bits: usize,
    witness_columns: usize,
    value: Option<&String>,
) -> Result<(), Box<dyn Error>> {
    let value = match value {
        Some(v) => v.parse::<BigUint>()?,
        None => rand::thread_rng().gen_biguint(bits as u64),
    };
    info!("Range checking {value} against 2^{bits} on {witness_columns} witness columns");

    let mut table = AssignmentTable::new(TableShape::new(witness_columns, 1, 1));
    let mut circuit = Circuit::new();
    table.set_public_input(0, 0, Fr::from_biguint(&value)?)?;
    let input = RangeCheckInput {
        x: Variable::public_input(0, 0),
    };

    let component = RangeCheck::new(ComponentColumns::contiguous(witness_columns, 1), bits)?;
    component.generate_circuit(&mut circuit, &mut table, &input, 0)?;
    component.generate_assignments(&mut table, &input, 0)?;

    report(&circuit, &table);
    is_satisfied(&circuit, &table)?;
    println!("satisfied");
    Ok(())
}

fn linear_check(entries: usize, witness_columns: usize) -> Result<(), Box<dyn Error>> {
    info!("Folding {entries} random evaluations on {witness_columns} witness columns");
    let mut rng = rand::thread_rng();

    // x, theta, y, then one point and one claimed evaluation per entry
    let values: Vec<Fr> = (0..3 + 2 * entries).map(|_| Fr::rand(&mut rng)).collect();
    let mut table = AssignmentTable::new(TableShape::new(witness_columns, 1, 1));
    for (row, value) in values.into_iter().enumerate() {
        table.set_public_input(0, row, value)?;
    }
    let pi = |row| Variable::public_input(0, row);
    let input = LinearCheckInput {
        x: pi(0),
        theta: pi(1),
        y: vec![pi(2)],
        xi: (0..entries).map(|l| pi(3 + l)).collect(),
        z: (0..entries).map(|l| pi(3 + entries + l)).collect(),
        eval_map: (0..entries).map(|l| (l, 0)).collect(),
    };

    let mut circuit = Circuit::new();
    let component = LinearCheck::new(ComponentColumns::contiguous(witness_columns, 1), entries)?;
    let output = component.generate_circuit(&mut circuit, &mut table, &input, 0)?;
    component.generate_assignments(&mut table, &input, 0)?;

    report(&circuit, &table);
    is_satisfied(&circuit, &table)?;
    println!("folded value: {}", table.get(&output.q)?.to_biguint());
    println!("satisfied");
    Ok(())
}

pub fn main() {
    // See https://github.com/rust-lang/log
    env_logger::init();

    let arg_witness_columns =
        clap::arg!(--"witness-columns" <USIZE> "Number of witness columns available")
            .value_parser(clap::value_parser!(usize));

    let cmd = clap::Command::new("circuit-stats")
        .bin_name("circuit-stats")
        .subcommand_required(true)
        .subcommand(
            clap::Command::new("range-check")
                .arg(
                    clap::arg!(--"bits" <USIZE> "Number of bits the value must fit in")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(arg_witness_columns.clone())
                .arg(clap::arg!(--"value" [DECIMAL] "Value to check, random if omitted"))
                .arg_required_else_help(true),
        )
        .subcommand(
            clap::Command::new("linear-check")
                .arg(
                    clap::arg!(--"entries" <USIZE> "Number of evaluation map entries")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(arg_witness_columns)
                .arg_required_else_help(true),
        );

    let matches = cmd.get_matches();
    let result = match matches.subcommand() {
        Some(("range-check", matches)) => range_check(
            *matches.get_one::<usize>("bits").unwrap(),
            *matches.get_one::<usize>("witness-columns").unwrap(),
            matches.get_one::<String>("value"),
        ),
        Some(("linear-check", matches)) => linear_check(
            *matches.get_one::<usize>("entries").unwrap(),
            *matches.get_one::<usize>("witness-columns").unwrap(),
        ),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
