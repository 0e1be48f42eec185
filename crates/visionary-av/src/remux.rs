//! Remux execution with the ffmpeg CLI.
//!
//! Runs the directives of a [`RemuxPlan`]. Each directive is one ffmpeg
//! invocation mapping a single input stream to its output with stream copy.
//! Failures are returned to the caller; nothing is retried.

use crate::plan::{Directive, RemuxPlan};
use crate::{Error, Result};
use std::path::Path;
use std::process::Command;

/// Build the ffmpeg arguments for one directive.
///
/// ```
/// use std::path::PathBuf;
/// use visionary_av::plan::{CodecMode, Directive, RemuxPlan};
/// use visionary_av::remux::ffmpeg_args;
/// use visionary_av::StreamKind;
///
/// let directive = Directive {
///     kind: StreamKind::Audio,
///     stream_index: 1,
///     output: PathBuf::from("/movies/movie.eac3"),
///     codec: CodecMode::Copy,
///     format: None,
///     bitstream_filter: None,
///     metadata: vec![],
/// };
/// let plan = RemuxPlan {
///     input: PathBuf::from("/movies/movie.mkv"),
///     overwrite: true,
///     directives: vec![directive.clone()],
/// };
///
/// assert_eq!(
///     ffmpeg_args(&plan, &directive).join(" "),
///     "-hide_banner -y -i /movies/movie.mkv -map 0:1 -c copy /movies/movie.eac3"
/// );
/// ```
pub fn ffmpeg_args(plan: &RemuxPlan, directive: &Directive) -> Vec<String> {
    let mut args: Vec<String> = vec!["-hide_banner".to_string()];

    args.push(if plan.overwrite { "-y" } else { "-n" }.to_string());
    args.push("-i".to_string());
    args.push(plan.input.to_string_lossy().into_owned());

    args.push("-map".to_string());
    args.push(format!("0:{}", directive.stream_index));
    args.push("-c".to_string());
    args.push(directive.codec.ffmpeg_name().to_string());

    if let Some(ref filter) = directive.bitstream_filter {
        args.push(format!("-bsf:{}", directive.kind.specifier()));
        args.push(filter.clone());
    }

    // The output has exactly one stream, so it is always output stream 0.
    for entry in &directive.metadata {
        args.push("-metadata:s:0".to_string());
        args.push(format!("{}={}", entry.key, entry.value));
    }

    if let Some(ref format) = directive.format {
        args.push("-f".to_string());
        args.push(format.clone());
    }

    args.push(directive.output.to_string_lossy().into_owned());
    args
}

/// Run one directive.
///
/// # Errors
///
/// - [`Error::ToolNotFound`] if ffmpeg cannot be spawned.
/// - [`Error::ToolFailed`] if ffmpeg exits with a non-zero status.
/// - [`Error::Io`] if the output directory cannot be created.
pub fn execute_directive(ffmpeg: &Path, plan: &RemuxPlan, directive: &Directive) -> Result<()> {
    if let Some(parent) = directive.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    tracing::debug!(
        "Extracting {} stream {} of {:?} -> {:?}",
        directive.kind,
        directive.stream_index,
        plan.input,
        directive.output
    );

    let result = Command::new(ffmpeg)
        .args(ffmpeg_args(plan, directive))
        .output()
        .map_err(|e| Error::from_spawn("ffmpeg", e))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(Error::tool_failed("ffmpeg", stderr.trim().to_string()));
    }

    tracing::info!("Wrote {:?}", directive.output);
    Ok(())
}

/// The result of running one directive.
#[derive(Debug)]
pub struct DirectiveOutcome<'a> {
    pub directive: &'a Directive,
    pub result: Result<()>,
}

/// Run every directive of a plan in order.
///
/// A failed directive does not stop the ones after it; each outcome is
/// returned for the caller to act on.
pub fn execute_plan<'a>(ffmpeg: &Path, plan: &'a RemuxPlan) -> Vec<DirectiveOutcome<'a>> {
    plan.directives
        .iter()
        .map(|directive| DirectiveOutcome {
            directive,
            result: execute_directive(ffmpeg, plan, directive),
        })
        .collect()
}
