//! Field names and the default ParGaMD form layout.
//!
//! Steps: 1 system setup, 2 molecular system (uploads), 3 cGaMD
//! parameters, 4 WE parameters, 5 review & generate, 6 run & monitor.

use super::field::Field;
use super::FormModel;

pub const ACCOUNT: &str = "account";
pub const EMAIL: &str = "email";
pub const PROTEIN_NAME: &str = "protein_name";
pub const NSTLIM: &str = "nstlim";
pub const NTPR: &str = "ntpr";
pub const ENABLE_GPU_PARALLELIZATION: &str = "enable_gpu_parallelization";
pub const BIN_TARGET_COUNTS: &str = "bin_target_counts";
pub const MAX_TOTAL_ITERATIONS: &str = "max_total_iterations";
pub const PC1_MIN: &str = "pc1_min";
pub const PC1_MAX: &str = "pc1_max";
pub const PC1_STEP: &str = "pc1_step";
pub const PC2_MIN: &str = "pc2_min";
pub const PC2_MAX: &str = "pc2_max";
pub const PC2_STEP: &str = "pc2_step";
pub const INCLUDE_INFINITE_BOUNDS: &str = "include_infinite_bounds";

/// Configuration files the backend can preview.
pub const PREVIEW_FILES: [&str; 5] = ["west.cfg", "env.sh", "runseg.sh", "run_cmd.sh", "run_we.sh"];

/// The six-step experiment form.
pub fn pargamd_form() -> FormModel {
    FormModel::new(vec![
        Field::text(ACCOUNT, "SLURM Account", 1).required(),
        Field::email(EMAIL, "Email", 1).required(),
        Field::text(PROTEIN_NAME, "Protein Name", 2).required(),
        Field::number(NSTLIM, "Steps per Segment (nstlim)", 3, Some(1.0), None)
            .required()
            .with_value("50000"),
        Field::number(NTPR, "Progress Output Interval (ntpr)", 3, Some(1.0), None)
            .required()
            .with_value("500"),
        Field::checkbox(ENABLE_GPU_PARALLELIZATION, "Multi-GPU Parallelization", 3),
        Field::number(BIN_TARGET_COUNTS, "Walkers per Bin", 4, Some(1.0), None)
            .required()
            .with_value("4"),
        Field::number(MAX_TOTAL_ITERATIONS, "Max Iterations", 4, Some(1.0), None)
            .required()
            .with_value("1000"),
        Field::number(PC1_MIN, "PC1 (RMSD) Min", 4, None, None)
            .required()
            .with_value("0.0"),
        Field::number(PC1_MAX, "PC1 (RMSD) Max", 4, None, None)
            .required()
            .with_value("8.0"),
        Field::number(PC1_STEP, "PC1 (RMSD) Step", 4, Some(0.0), None)
            .required()
            .with_value("0.2"),
        Field::number(PC2_MIN, "PC2 (Rg) Min", 4, None, None)
            .required()
            .with_value("0.0"),
        Field::number(PC2_MAX, "PC2 (Rg) Max", 4, None, None)
            .required()
            .with_value("8.0"),
        Field::number(PC2_STEP, "PC2 (Rg) Step", 4, Some(0.0), None)
            .required()
            .with_value("0.2"),
        Field::checkbox(INCLUDE_INFINITE_BOUNDS, "Include -inf/inf bin bounds", 5).checked(true),
    ])
}
