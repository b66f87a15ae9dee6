use tracing::warn;

use strudelize_analysis::{AnalysisParams, KeyEstimator, NoteMapper, RhythmGridMapper};
use strudelize_audio::PreviewExporter;
use strudelize_domain::{
    AudioSignal, FeatureSet, NoteEvent, Step, StepPattern, StemFeatureSet, StrudelResult,
};

const HIT_TOKEN: &str = "bd";
const REST_TOKEN: &str = "~";
const MAIN_SOUND: &str = "piano";

/// Assembles the final pattern-code artifact: tempo header, estimated key,
/// a melodic and a percussive layer from the main mix, and one layer per
/// stem, all stacked as independently playable `$:` parts. Code generation
/// is a pure function of the features; only the preview clip touches disk.
pub struct PatternComposer {
    key: KeyEstimator,
    notes: NoteMapper,
    rhythm: RhythmGridMapper,
    preview: PreviewExporter,
}

impl PatternComposer {
    pub fn new(params: &AnalysisParams, grid: usize, preview_seconds: f64) -> Self {
        Self {
            key: KeyEstimator,
            notes: NoteMapper::new(params.hop_size),
            rhythm: RhythmGridMapper::new(grid),
            preview: PreviewExporter::new(preview_seconds),
        }
    }

    pub fn compose(
        &self,
        signal: &AudioSignal,
        features: &FeatureSet,
        stems: &[StemFeatureSet],
    ) -> StrudelResult {
        let code = self.render_code(signal.sample_rate(), features, stems);
        let preview_path = match self.preview.export(signal) {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(error = %err, "preview export failed, returning code only");
                None
            }
        };
        StrudelResult::new(code, preview_path)
    }

    /// Deterministic text for a feature bundle; identical inputs yield
    /// byte-identical output.
    pub fn render_code(
        &self,
        sample_rate: u32,
        features: &FeatureSet,
        stems: &[StemFeatureSet],
    ) -> String {
        let mut lines = Vec::new();

        let key = self.key.estimate(&features.chroma);
        lines.push(format!("// key: {}", key));
        lines.push(format!("setcpm({}/4)", features.tempo_bpm.round() as i64));

        let main_notes =
            self.notes
                .map(&features.pitch_contour, sample_rate, &features.onset_times);
        if !main_notes.is_empty() {
            lines.push(format!(
                "$: note(`{}`).sound(\"{}\")",
                melodic_tokens(&main_notes),
                MAIN_SOUND
            ));
        }

        let pattern = self.rhythm.map(&features.onset_times, features.tempo_bpm);
        lines.push(format!("$: s(`{}`)", rhythm_tokens(&pattern)));

        for stem in stems {
            lines.push(format!("// stem: {}", stem.label));
            if stem.notes.is_empty() {
                let pattern = self
                    .rhythm
                    .map(&stem.features.onset_times, stem.features.tempo_bpm);
                lines.push(format!("$: s(`{}`)", rhythm_tokens(&pattern)));
            } else {
                lines.push(format!(
                    "$: note(`{}`).sound(\"{}\")",
                    melodic_tokens(&stem.notes),
                    stem_sound(&stem.label)
                ));
            }
        }

        let mut code = lines.join("\n");
        code.push('\n');
        code
    }
}

impl Default for PatternComposer {
    fn default() -> Self {
        Self::new(&AnalysisParams::default(), 16, 12.0)
    }
}

/// Run-length grouping of consecutive identical notes. A note repeated n ≥ 2
/// times in a row becomes `name!n`, which keeps motifs structurally visible
/// instead of flattening every onset into one long list.
fn melodic_tokens(notes: &[NoteEvent]) -> String {
    let mut tokens = Vec::new();
    let mut index = 0;
    while index < notes.len() {
        let name = notes[index].name;
        let mut run = 1;
        while index + run < notes.len() && notes[index + run].name == name {
            run += 1;
        }
        if run > 1 {
            tokens.push(format!("{}!{}", name, run));
        } else {
            tokens.push(name.to_string());
        }
        index += run;
    }
    tokens.join(" ")
}

fn rhythm_tokens(pattern: &StepPattern) -> String {
    pattern
        .slots()
        .iter()
        .map(|slot| match slot {
            Step::Hit => HIT_TOKEN,
            Step::Rest => REST_TOKEN,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn stem_sound(label: &str) -> &'static str {
    match label.to_ascii_lowercase().as_str() {
        "vocals" => "sine",
        "bass" => "sawtooth",
        "other" => "triangle",
        _ => "square",
    }
}
