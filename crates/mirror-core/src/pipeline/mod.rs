//! Tree reconciliation pipeline
//!
//! A fixed, ordered sequence of idempotent passes that repairs the layout
//! produced by the remote export: split slash-titled files, script-mixed
//! names, unsafe characters and renderer-hazardous markup. Several passes
//! run more than once because later passes can recreate what earlier ones
//! fixed.
//!
//! Passes never abort the pipeline. A failed item is logged, recorded as a
//! warning and skipped; the next run picks it up again.

mod context;
mod escape;
mod fold;
mod headers;
mod names;
mod prune;
mod report;
mod slash;

use std::path::Path;

use tracing::{debug, info, warn};

use context::PassContext;

pub use report::{NormalizationAction, PassReport, PipelineReport};

/// Which spelling of a slash title a slash pass looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashForm {
    /// Title segments as written.
    Original,
    /// Title segments after transliteration.
    Transliterated,
    /// Both spellings.
    Any,
}

/// One reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Delete `untitled` documents that contain only their placeholder heading.
    PrunePlaceholders,
    /// Wrap `{…}` and empty tags in inline literals.
    EscapeInline,
    /// Wrap raw table markup in fenced `html` blocks.
    EscapeBlocks,
    /// Join files split into directories by a `/` in their title.
    SlashTitles(SlashForm),
    /// Move metadata-backed documents to transliterated paths and add headers.
    TransliterateTree,
    /// Move `X.md` into a sibling directory `X/`.
    FoldSameName,
    /// Merge original-script directories into existing transliterated ones.
    FoldLocaleDirs,
    /// Rename remaining original-script directories.
    TransliterateOrphanDirs,
    /// Rename remaining original-script documents.
    TransliterateOrphanFiles,
    /// Apply the deletion and substitution tables to unsafe names.
    SanitizeNames,
    /// Remove whitespace right before the `.md` extension.
    TrimExtensionSpace,
    /// Remove empty directories below the root.
    PruneEmptyDirs,
}

/// The standard sequence. Steps 12, 13 and 15 repeat steps 6, 3 and 0.
pub const STANDARD_PASSES: [Pass; 16] = [
    Pass::PrunePlaceholders,
    Pass::EscapeInline,
    Pass::EscapeBlocks,
    Pass::SlashTitles(SlashForm::Original),
    Pass::TransliterateTree,
    Pass::SlashTitles(SlashForm::Transliterated),
    Pass::FoldSameName,
    Pass::FoldLocaleDirs,
    Pass::TransliterateOrphanDirs,
    Pass::TransliterateOrphanFiles,
    Pass::SanitizeNames,
    Pass::TrimExtensionSpace,
    Pass::FoldSameName,
    Pass::SlashTitles(SlashForm::Any),
    Pass::PruneEmptyDirs,
    Pass::PrunePlaceholders,
];

/// Default cap for [`PipelineMode::Converge`].
pub const DEFAULT_MAX_ROUNDS: usize = 4;

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PrunePlaceholders => "prune-placeholders",
            Self::EscapeInline => "escape-inline",
            Self::EscapeBlocks => "escape-blocks",
            Self::SlashTitles(SlashForm::Original) => "slash-titles",
            Self::SlashTitles(SlashForm::Transliterated) => "slash-titles-transliterated",
            Self::SlashTitles(SlashForm::Any) => "slash-titles-any",
            Self::TransliterateTree => "transliterate-tree",
            Self::FoldSameName => "fold-same-name",
            Self::FoldLocaleDirs => "fold-locale-dirs",
            Self::TransliterateOrphanDirs => "transliterate-orphan-dirs",
            Self::TransliterateOrphanFiles => "transliterate-orphan-files",
            Self::SanitizeNames => "sanitize-names",
            Self::TrimExtensionSpace => "trim-extension-space",
            Self::PruneEmptyDirs => "prune-empty-dirs",
        }
    }

    /// Run this pass over the tree at `root`.
    pub fn run(&self, root: &Path, step: usize) -> PassReport {
        let mut ctx = PassContext::new(root, step, *self);
        match self {
            Self::PrunePlaceholders => prune::prune_placeholders(&mut ctx),
            Self::EscapeInline => escape::escape_inline(&mut ctx),
            Self::EscapeBlocks => escape::escape_blocks(&mut ctx),
            Self::SlashTitles(form) => slash::join_slash_titles(&mut ctx, *form),
            Self::TransliterateTree => headers::transliterate_tree(&mut ctx),
            Self::FoldSameName => fold::fold_same_name(&mut ctx),
            Self::FoldLocaleDirs => fold::fold_locale_dirs(&mut ctx, false),
            Self::TransliterateOrphanDirs => fold::fold_locale_dirs(&mut ctx, true),
            Self::TransliterateOrphanFiles => names::transliterate_orphan_files(&mut ctx),
            Self::SanitizeNames => names::sanitize_names(&mut ctx),
            Self::TrimExtensionSpace => names::trim_extension_space(&mut ctx),
            Self::PruneEmptyDirs => prune::prune_empty_dirs(&mut ctx),
        }
        ctx.finish()
    }
}

/// How the pipeline repeats the standard sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineMode {
    /// Run the sequence once.
    #[default]
    Fixed,
    /// Repeat the sequence until a round changes nothing, at most
    /// `max_rounds` times.
    Converge { max_rounds: usize },
}

/// A configured reconciliation pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    mode: PipelineMode,
}

impl Pipeline {
    pub fn fixed() -> Self {
        Self {
            mode: PipelineMode::Fixed,
        }
    }

    pub fn converge(max_rounds: usize) -> Self {
        Self {
            mode: PipelineMode::Converge {
                max_rounds: max_rounds.max(1),
            },
        }
    }

    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    /// Reconcile the working tree at `root` in place.
    ///
    /// The metadata document is read back from the tree by the passes that
    /// need it.
    pub fn run(&self, root: &Path) -> PipelineReport {
        let max_rounds = match self.mode {
            PipelineMode::Fixed => 1,
            PipelineMode::Converge { max_rounds } => max_rounds,
        };

        let mut report = PipelineReport::default();
        for round in 1..=max_rounds {
            let before = report.passes.len();
            run_sequence(root, &mut report);
            report.rounds = round;

            let changed = report.passes[before..].iter().any(|p| !p.is_noop());
            if !changed {
                report.converged = true;
                break;
            }
            if round == max_rounds {
                report.converged = matches!(self.mode, PipelineMode::Fixed);
            }
        }

        if !report.converged {
            warn!(rounds = report.rounds, "reconciliation did not converge");
        }
        info!(
            root = %root.display(),
            rounds = report.rounds,
            actions = report.action_count(),
            warnings = report.warning_count(),
            "reconciliation finished"
        );
        report
    }
}

fn run_sequence(root: &Path, report: &mut PipelineReport) {
    for (step, pass) in STANDARD_PASSES.iter().enumerate() {
        let pass_report = pass.run(root, step);
        debug!(
            step,
            pass = pass.name(),
            actions = pass_report.actions.len(),
            warnings = pass_report.warnings.len(),
            "pass complete"
        );
        report.passes.push(pass_report);
    }
}

/// Run the standard fixed sequence once over `root`.
pub fn reconcile(root: &Path) -> PipelineReport {
    Pipeline::fixed().run(root)
}
