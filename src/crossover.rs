//! Gene alignment between two genomes: compatibility distance and crossover. Both walk the
//! connection lists of each genome side by side, which must be sorted by innovation id.

use crate::{
    genome::{Connection, Genome, Node, NodeKind},
    random::Happens,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weights of the compatibility distance terms, and the normalization applied to gene counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// excess genes
    pub c1: f64,
    /// disjoint genes
    pub c2: f64,
    /// average weight difference of matching genes
    pub c3: f64,
    pub n: f64,
}

/// Count the disjoint and excess genes between two connection lists, returned as
/// `(disjoint, excess)`. Genes past the end of the shorter innovation range are excess,
/// every other unmatched gene is disjoint.
pub fn disjoint_excess_count(l: &[Connection], r: &[Connection]) -> (usize, usize) {
    let (mut l_idx, mut r_idx) = (0, 0);
    let mut disjoint = 0;
    while l_idx < l.len() && r_idx < r.len() {
        let (l_inno, r_inno) = (l[l_idx].inno, r[r_idx].inno);
        if l_inno == r_inno {
            l_idx += 1;
            r_idx += 1;
        } else {
            disjoint += 1;
            if l_inno < r_inno {
                l_idx += 1;
            } else {
                r_idx += 1;
            }
        }
    }

    (disjoint, (l.len() - l_idx) + (r.len() - r_idx))
}

/// Average absolute weight difference of genes present in both lists.
/// If the lists share no genes, their average difference is 0
pub fn avg_weight_diff(l: &[Connection], r: &[Connection]) -> f64 {
    let (mut l_idx, mut r_idx) = (0, 0);
    let mut diff_sum = 0.;
    let mut count = 0;
    while l_idx < l.len() && r_idx < r.len() {
        match l[l_idx].inno.cmp(&r[r_idx].inno) {
            core::cmp::Ordering::Equal => {
                diff_sum += (l[l_idx].weight - r[r_idx].weight).abs();
                count += 1;
                l_idx += 1;
                r_idx += 1;
            }
            core::cmp::Ordering::Less => l_idx += 1,
            core::cmp::Ordering::Greater => r_idx += 1,
        }
    }

    if count == 0 {
        0.
    } else {
        diff_sum / count as f64
    }
}

/// Compatibility distance between two connection lists
pub fn delta(l: &[Connection], r: &[Connection], coefficients: &Coefficients) -> f64 {
    let (disjoint, excess) = disjoint_excess_count(l, r);
    let Coefficients { c1, c2, c3, n } = *coefficients;
    c1 * excess as f64 / n + c2 * disjoint as f64 / n + c3 * avg_weight_diff(l, r)
}

/// Inherit a gene shared by both parents from either of them at random. An enabled gene
/// whose counterpart is disabled may be disabled in the child.
fn pick_matching(
    mom: &Connection,
    dad: &Connection,
    disable_chance: f64,
    rng: &mut impl RngCore,
) -> Connection {
    let (picked, other) = if rng.happens(0.5) {
        (mom, dad)
    } else {
        (dad, mom)
    };

    let mut child = picked.clone();
    if child.enabled && !other.enabled && rng.happens(disable_chance) {
        child.enabled = false;
    }
    child
}

/// Breed a child from two parents. Matching genes come from either parent, while disjoint
/// and excess genes only come from the fitter one, where ties favor `mom`. The child holds
/// the union of both parents' nodes.
pub fn crossover(
    mom: &Genome,
    dad: &Genome,
    disable_chance: f64,
    rng: &mut impl RngCore,
) -> Genome {
    let mom_fitter = mom.fitness >= dad.fitness;
    let (l, r) = (&mom.connections, &dad.connections);
    let mut connections = Vec::with_capacity(l.len().max(r.len()));

    let (mut l_idx, mut r_idx) = (0, 0);
    while l_idx < l.len() || r_idx < r.len() {
        match (l.get(l_idx), r.get(r_idx)) {
            (Some(l_conn), Some(r_conn)) if l_conn.inno == r_conn.inno => {
                connections.push(pick_matching(l_conn, r_conn, disable_chance, rng));
                l_idx += 1;
                r_idx += 1;
            }
            (Some(l_conn), Some(r_conn)) => {
                if l_conn.inno < r_conn.inno {
                    if mom_fitter {
                        connections.push(l_conn.clone());
                    }
                    l_idx += 1;
                } else {
                    if !mom_fitter {
                        connections.push(r_conn.clone());
                    }
                    r_idx += 1;
                }
            }
            (Some(l_conn), None) => {
                if mom_fitter {
                    connections.push(l_conn.clone());
                }
                l_idx += 1;
            }
            (None, Some(r_conn)) => {
                if !mom_fitter {
                    connections.push(r_conn.clone());
                }
                r_idx += 1;
            }
            (None, None) => unreachable!(),
        }
    }

    let mut kinds = BTreeMap::<usize, NodeKind>::new();
    for node in mom.nodes.iter().chain(dad.nodes.iter()) {
        kinds.entry(node.inno).or_insert(node.kind);
    }

    Genome {
        nodes: kinds
            .into_iter()
            .map(|(inno, kind)| Node { inno, kind })
            .collect(),
        connections,
        fitness: 0.,
    }
}
