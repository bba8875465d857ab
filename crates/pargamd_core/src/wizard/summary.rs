//! Review-step summary card, built from client state only.

use crate::form::layout::{
    ACCOUNT, BIN_TARGET_COUNTS, EMAIL, ENABLE_GPU_PARALLELIZATION, MAX_TOTAL_ITERATIONS, PC1_MAX,
    PC1_MIN, PC1_STEP, PC2_MAX, PC2_MIN, PC2_STEP, PROTEIN_NAME,
};
use crate::form::FormSnapshot;
use crate::models::UploadSlot;

use super::uploads::UploadTracker;

pub const NOT_UPLOADED: &str = "Not uploaded";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub title: String,
    /// (label, value) rows in display order.
    pub rows: Vec<(String, String)>,
}

impl SummarySection {
    fn new(title: &str, rows: Vec<(&str, String)>) -> Self {
        Self {
            title: title.to_string(),
            rows: rows
                .into_iter()
                .map(|(label, value)| (label.to_string(), value))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryCard {
    pub sections: Vec<SummarySection>,
}

impl SummaryCard {
    pub fn build(snapshot: &FormSnapshot, uploads: &UploadTracker) -> Self {
        let uploaded = |slot: UploadSlot| {
            uploads
                .filename(slot)
                .filter(|name| !name.is_empty())
                .unwrap_or(NOT_UPLOADED)
                .to_string()
        };
        let range = |min: &str, max: &str, step: &str| {
            format!(
                "{} to {} (step: {})",
                snapshot.text(min),
                snapshot.text(max),
                snapshot.text(step)
            )
        };
        let gpu = if snapshot.flag(ENABLE_GPU_PARALLELIZATION) {
            "Enabled"
        } else {
            "Disabled"
        };

        Self {
            sections: vec![
                SummarySection::new(
                    "System Setup",
                    vec![
                        ("SLURM Account", snapshot.text(ACCOUNT)),
                        ("Email", snapshot.text(EMAIL)),
                    ],
                ),
                SummarySection::new(
                    "Molecular System",
                    vec![
                        ("Protein Name", snapshot.text(PROTEIN_NAME)),
                        ("PDB File", uploaded(UploadSlot::Pdb)),
                        ("PRMTOP File", uploaded(UploadSlot::Prmtop)),
                    ],
                ),
                SummarySection::new(
                    "WE Parameters",
                    vec![
                        ("Walkers per Bin", snapshot.text(BIN_TARGET_COUNTS)),
                        ("Max Iterations", snapshot.text(MAX_TOTAL_ITERATIONS)),
                        ("PC1 (RMSD)", range(PC1_MIN, PC1_MAX, PC1_STEP)),
                        ("PC2 (Rg)", range(PC2_MIN, PC2_MAX, PC2_STEP)),
                    ],
                ),
                SummarySection::new(
                    "GPU Options",
                    vec![("Multi-GPU Parallelization", gpu.to_string())],
                ),
            ],
        }
    }

    /// Value of the first row with this label.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::pargamd_form;
    use crate::models::UploadedFileRecord;

    #[test]
    fn summary_uses_form_and_uploads() {
        let mut form = pargamd_form();
        form.set_text(ACCOUNT, "TG-MCB1234");
        form.set_text(PROTEIN_NAME, "T4L");
        form.set_checked(ENABLE_GPU_PARALLELIZATION, true);

        let mut uploads = UploadTracker::new();
        uploads.confirm(
            UploadSlot::Pdb,
            UploadedFileRecord {
                file_path: "uploads/t4l.pdb".into(),
                filename: "t4l.pdb".into(),
                file_type: "pdb_file".into(),
            },
        );

        let card = SummaryCard::build(&form.snapshot(), &uploads);

        let titles: Vec<&str> = card.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["System Setup", "Molecular System", "WE Parameters", "GPU Options"]
        );
        assert_eq!(card.value("SLURM Account"), Some("TG-MCB1234"));
        assert_eq!(card.value("Email"), Some(""));
        assert_eq!(card.value("PDB File"), Some("t4l.pdb"));
        assert_eq!(card.value("PRMTOP File"), Some(NOT_UPLOADED));
        assert_eq!(card.value("Walkers per Bin"), Some("4"));
        assert_eq!(card.value("Max Iterations"), Some("1000"));
        assert_eq!(card.value("PC1 (RMSD)"), Some("0.0 to 8.0 (step: 0.2)"));
        assert_eq!(card.value("Multi-GPU Parallelization"), Some("Enabled"));
    }
}
