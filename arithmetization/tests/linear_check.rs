use arithmetization::{
    components::linear_check::{EvalMapEntry, LinearCheck, LinearCheckInput},
    is_satisfied, AssignmentTable, Circuit, CircuitError, Component, ComponentColumns,
    SatisfiabilityError, TableShape, Variable,
};
use ark_bn254::Fr;
use ark_ff::{Field, One, UniformRand, Zero};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

/// Public values in the order x, theta, xi.., y.., z..
struct Claim {
    x: Fr,
    theta: Fr,
    xi: Vec<Fr>,
    y: Vec<Fr>,
    z: Vec<Fr>,
    eval_map: Vec<EvalMapEntry>,
}

impl Claim {
    fn random(rng: &mut StdRng, points: usize, polynomials: usize, entries: usize) -> Self {
        let mut values = |n: usize| (0..n).map(|_| Fr::rand(&mut *rng)).collect::<Vec<_>>();
        let x = values(1)[0];
        let theta = values(1)[0];
        let xi = values(points);
        let y = values(polynomials);
        let z = values(entries);
        let eval_map = (0..entries)
            .map(|l| (l % points, (l * 7) % polynomials))
            .collect();
        Claim {
            x,
            theta,
            xi,
            y,
            z,
            eval_map,
        }
    }

    /// sum_l theta^l (y - z_l) / (x - xi)
    fn fold(&self) -> Fr {
        let mut acc = Fr::zero();
        let mut power = Fr::one();
        for (l, (point, polynomial)) in self.eval_map.iter().enumerate() {
            let q = (self.y[*polynomial] - self.z[l])
                * (self.x - self.xi[*point]).inverse().unwrap();
            acc += power * q;
            power *= self.theta;
        }
        acc
    }

    fn lay_out(&self, witness_columns: usize) -> (AssignmentTable<Fr>, LinearCheckInput) {
        let mut table = AssignmentTable::new(TableShape::new(witness_columns, 1, 1));
        let mut row = 0;
        let mut push = |value: Fr| {
            table.set_public_input(0, row, value).unwrap();
            row += 1;
            Variable::public_input(0, row - 1)
        };
        let x = push(self.x);
        let theta = push(self.theta);
        let xi = self.xi.iter().map(|v| push(*v)).collect();
        let y = self.y.iter().map(|v| push(*v)).collect();
        let z = self.z.iter().map(|v| push(*v)).collect();
        let input = LinearCheckInput {
            x,
            theta,
            xi,
            y,
            z,
            eval_map: self.eval_map.clone(),
        };
        (table, input)
    }

    fn check(&self, witness_columns: usize) -> (Fr, Circuit<Fr>, AssignmentTable<Fr>) {
        let (mut table, input) = self.lay_out(witness_columns);
        let lc = LinearCheck::new(
            ComponentColumns::contiguous(witness_columns, 1),
            self.eval_map.len(),
        )
        .unwrap();
        let mut circuit = Circuit::new();
        let output = lc
            .generate_circuit(&mut circuit, &mut table, &input, 0)
            .unwrap();
        lc.generate_assignments(&mut table, &input, 0).unwrap();
        (table.get(&output.q).unwrap(), circuit, table)
    }
}

fn known_claim(x: u64, xi: u64, y: u64, z: u64, theta: u64) -> Claim {
    Claim {
        x: Fr::from(x),
        theta: Fr::from(theta),
        xi: vec![Fr::from(xi)],
        y: vec![Fr::from(y)],
        z: vec![Fr::from(z)],
        eval_map: vec![(0, 0)],
    }
}

#[test]
fn test_single_entry_on_two_rows() {
    let (q, circuit, table) = known_claim(5, 3, 10, 4, 7).check(5);
    assert_eq!(q, Fr::from(3u64));
    assert_eq!(table.witness(0, 0), Ok(Fr::from(5u64)));
    // inverse at cell 2, q at cell 5 = row 1 column 0
    assert_eq!(table.witness(2, 0), Ok(Fr::from(2u64).inverse().unwrap()));
    assert_eq!(table.witness(0, 1), Ok(Fr::from(3u64)));
    assert_eq!(circuit.gates_amount(), 1);
    assert_eq!(is_satisfied(&circuit, &table), Ok(()));
}

#[test]
fn test_two_entries_fold_in_map_order() {
    // entry 0: (10 - 4) / (5 - 3) = 3, entry 1: (10 - 1) / (5 - 2) = 3
    let claim = Claim {
        x: Fr::from(5u64),
        theta: Fr::from(7u64),
        xi: vec![Fr::from(3u64), Fr::from(2u64)],
        y: vec![Fr::from(10u64)],
        z: vec![Fr::from(4u64), Fr::from(1u64)],
        eval_map: vec![(0, 0), (1, 0)],
    };
    let (q, circuit, table) = claim.check(9);
    assert_eq!(q, Fr::from(3u64 + 7 * 3));
    assert_eq!(q, claim.fold());
    assert_eq!(is_satisfied(&circuit, &table), Ok(()));
}

#[test]
fn test_forged_inverse_is_rejected() {
    let (_, circuit, mut table) = known_claim(5, 3, 10, 4, 7).check(9);
    table.set_witness(2, 0, Fr::from(5u64)).unwrap();
    assert_eq!(
        is_satisfied(&circuit, &table),
        Err(SatisfiabilityError::Constraint {
            selector: 0,
            row: 0,
            index: 1
        })
    );
}

#[test]
fn test_forged_accumulator_is_rejected() {
    let (_, circuit, mut table) = known_claim(5, 3, 10, 4, 7).check(9);
    table.set_witness(8, 0, Fr::from(4u64)).unwrap();
    assert_eq!(
        is_satisfied(&circuit, &table),
        Err(SatisfiabilityError::Constraint {
            selector: 0,
            row: 0,
            index: 3
        })
    );
}

#[test]
fn test_equal_points() {
    let (mut table, input) = known_claim(3, 3, 10, 4, 7).lay_out(9);
    let lc = LinearCheck::new(ComponentColumns::contiguous(9, 1), 1).unwrap();
    assert_eq!(
        lc.generate_assignments(&mut table, &input, 0),
        Err(CircuitError::NotInvertible {
            component: "linear_check",
            entry: 0
        })
    );
}

#[test]
fn test_instances_share_the_gate() {
    let mut rng = StdRng::seed_from_u64(0);
    let first = Claim::random(&mut rng, 2, 2, 3);
    let (mut table, input) = first.lay_out(9);
    let lc = LinearCheck::new(ComponentColumns::contiguous(9, 1), 3).unwrap();
    let rows = <LinearCheck as Component<Fr>>::rows_amount(&lc);
    let mut circuit = Circuit::new();
    for start in [0, rows] {
        lc.generate_circuit(&mut circuit, &mut table, &input, start)
            .unwrap();
        lc.generate_assignments(&mut table, &input, start).unwrap();
    }
    assert_eq!(circuit.gates_amount(), 1);
    assert_eq!(is_satisfied(&circuit, &table), Ok(()));
}

proptest! {
    #[test]
    fn test_fold_matches_the_formula(
        seed in any::<u64>(),
        entries in 1usize..=6,
        points in 1usize..=4,
        polynomials in 1usize..=3,
        witness_columns in 5usize..=12,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let claim = Claim::random(&mut rng, points, polynomials, entries);
        let (q, circuit, table) = claim.check(witness_columns);
        prop_assert_eq!(q, claim.fold());
        prop_assert_eq!(is_satisfied(&circuit, &table), Ok(()));
    }

    #[test]
    fn test_perturbing_an_entry_changes_the_fold(
        seed in any::<u64>(),
        entries in 1usize..=5,
        target in any::<prop::sample::Index>(),
        which in 0usize..3,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut claim = Claim::random(&mut rng, entries, entries, entries);
        claim.eval_map = (0..entries).map(|l| (l, l)).collect();
        let (before, _, _) = claim.check(9);

        let l = target.index(entries);
        match which {
            0 => claim.y[l] += Fr::one(),
            1 => claim.z[l] += Fr::one(),
            _ => claim.xi[l] += Fr::one(),
        }
        prop_assume!(claim.xi.iter().all(|xi| *xi != claim.x));
        let (after, _, _) = claim.check(9);
        prop_assert_ne!(before, after);
    }
}
