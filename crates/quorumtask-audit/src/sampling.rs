use serde::{Deserialize, Serialize};

/// Upper bound on candidates drawn in random sampling
pub const MAX_RANDOM_SAMPLE: usize = 5;

/// Which of a round's submissions get evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
    /// Every submission
    Exhaustive,
    /// Up to `k` distinct submissions, `k` capped at `MAX_RANDOM_SAMPLE`
    Random(usize),
}

impl Default for SamplingMode {
    fn default() -> Self {
        SamplingMode::Random(MAX_RANDOM_SAMPLE)
    }
}

impl SamplingMode {
    /// Candidate indices into a list of `len` submissions, ascending.
    /// Random draws are reseeded on every call.
    pub fn select_indices(&self, len: usize) -> Vec<usize> {
        match *self {
            SamplingMode::Exhaustive => (0..len).collect(),
            SamplingMode::Random(k) => {
                let amount = k.min(MAX_RANDOM_SAMPLE).min(len);
                let mut picked =
                    rand::seq::index::sample(&mut rand::thread_rng(), len, amount).into_vec();
                picked.sort_unstable();
                picked
            }
        }
    }
}
