use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use tracing::{info, instrument, warn};

use crate::core::io::pdb::ReferenceAtom;
use crate::core::models::pocket::Pocket;

/// Fills each pocket's centroid with the arithmetic mean of the reference
/// atoms whose residue id is in the pocket's member set.
///
/// The match runs on residue id alone; a structure with repeated numbering
/// across chains contributes every matching atom to the mean. A pocket with
/// zero matches (numbering mismatch between the score stream and the
/// structure) gets the origin and is marked degraded, which the caller
/// surfaces as a warning since an origin-centered docking box is physically
/// meaningless.
#[instrument(skip_all, name = "centroid_task")]
pub fn run(pockets: &mut [Pocket], atoms: &[ReferenceAtom]) {
    let mut by_residue: HashMap<i64, Vec<Point3<f64>>> = HashMap::new();
    for atom in atoms {
        by_residue.entry(atom.residue_id).or_default().push(atom.position);
    }

    let mut degraded = 0usize;
    for pocket in pockets.iter_mut() {
        let mut sum = Vector3::zeros();
        let mut count = 0usize;
        for residue_id in &pocket.residue_ids {
            if let Some(positions) = by_residue.get(residue_id) {
                for position in positions {
                    sum += position.coords;
                    count += 1;
                }
            }
        }

        if count == 0 {
            pocket.centroid = Some(Point3::origin());
            pocket.degraded_centroid = true;
            degraded += 1;
            warn!(
                pocket = %pocket.label(),
                "No reference atoms matched; centroid degraded to origin."
            );
        } else {
            pocket.centroid = Some(Point3::from(sum / count as f64));
        }
    }

    info!(
        num_pockets = pockets.len(),
        degraded, "Centroid computation complete."
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(residue_id: i64, x: f64, y: f64, z: f64) -> ReferenceAtom {
        ReferenceAtom {
            residue_id,
            position: Point3::new(x, y, z),
        }
    }

    #[test]
    fn centroid_is_the_mean_over_matched_residues() {
        let atoms = vec![
            atom(10, 0.0, 0.0, 0.0),
            atom(11, 2.0, 4.0, 6.0),
            atom(12, 4.0, 2.0, 3.0),
            atom(99, 100.0, 100.0, 100.0),
        ];
        let mut pockets = vec![Pocket::new(1, vec![10, 11, 12])];
        run(&mut pockets, &atoms);

        assert_eq!(pockets[0].centroid, Some(Point3::new(2.0, 2.0, 3.0)));
        assert!(!pockets[0].degraded_centroid);
    }

    #[test]
    fn unmatched_pocket_degrades_to_the_origin() {
        let atoms = vec![atom(500, 1.0, 1.0, 1.0)];
        let mut pockets = vec![Pocket::new(1, vec![10, 11])];
        run(&mut pockets, &atoms);

        assert_eq!(pockets[0].centroid, Some(Point3::origin()));
        assert!(pockets[0].degraded_centroid);
    }

    #[test]
    fn partially_matched_pocket_averages_what_it_finds() {
        let atoms = vec![atom(10, 3.0, 0.0, 0.0)];
        let mut pockets = vec![Pocket::new(1, vec![10, 11, 12])];
        run(&mut pockets, &atoms);

        assert_eq!(pockets[0].centroid, Some(Point3::new(3.0, 0.0, 0.0)));
        assert!(!pockets[0].degraded_centroid);
    }

    #[test]
    fn duplicate_residue_numbering_contributes_every_match() {
        // Two chains both numbered from 1.
        let atoms = vec![atom(1, 0.0, 0.0, 0.0), atom(1, 2.0, 2.0, 2.0)];
        let mut pockets = vec![Pocket::new(1, vec![1])];
        run(&mut pockets, &atoms);

        assert_eq!(pockets[0].centroid, Some(Point3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn each_pocket_is_filled_independently() {
        let atoms = vec![atom(10, 1.0, 0.0, 0.0), atom(20, 5.0, 0.0, 0.0)];
        let mut pockets = vec![
            Pocket::new(1, vec![10]),
            Pocket::new(2, vec![15]),
            Pocket::new(3, vec![20]),
        ];
        run(&mut pockets, &atoms);

        assert!(!pockets[0].degraded_centroid);
        assert!(pockets[1].degraded_centroid);
        assert!(!pockets[2].degraded_centroid);
        assert_eq!(pockets[2].centroid, Some(Point3::new(5.0, 0.0, 0.0)));
    }
}
