use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info};

use fwf_ingest::{
    ConvertOptions, InferenceMode, InferenceOptions, NoProgress, ProgressSink,
    convert_to_tabular_with_progress, infer_types_with_options, read_rows,
};
use fwf_model::Tape;
use fwf_report::{SqlScriptOptions, TypingPolicy, generate_sql_script, write_sql_script};

use crate::cli::{
    Command, ConvertArgs, InferArgs, PreviewArgs, SampleArgs, SqlArgs, TapeCommand,
};
use crate::progress::SpinnerProgress;
use crate::types::{
    ConvertResult, InferResult, Outcome, PreviewResult, SqlResult, TapeChange, TapeResult,
};

pub fn run(command: &Command) -> Result<Outcome> {
    match command {
        Command::Tape(tape) => run_tape(tape).map(Outcome::Tape),
        Command::Convert(args) => run_convert(args).map(Outcome::Convert),
        Command::Infer(args) => run_infer(args).map(Outcome::Infer),
        Command::Sql(args) => run_sql(args).map(Outcome::Sql),
        Command::Preview(args) => run_preview(args).map(Outcome::Preview),
    }
}

pub fn run_tape(command: &TapeCommand) -> Result<TapeResult> {
    match command {
        TapeCommand::Show(args) => {
            let tape = load_tape(&args.tape)?;
            Ok(TapeResult {
                path: args.tape.clone(),
                tape,
                change: None,
            })
        }
        TapeCommand::Add(args) => {
            let path = &args.tape.tape;
            let mut tape = load_or_new_tape(path)?;
            let existed = tape.contains(&args.name);
            tape.add_or_replace(
                args.name.as_str(),
                args.start,
                args.end,
                args.declared_type.clone(),
            )
            .with_context(|| format!("add field '{}'", args.name))?;
            save_tape(&tape, path)?;
            let change = if existed {
                TapeChange::Replaced(args.name.clone())
            } else {
                TapeChange::Added(args.name.clone())
            };
            Ok(TapeResult {
                path: path.clone(),
                tape,
                change: Some(change),
            })
        }
        TapeCommand::Alter(args) => {
            let path = &args.tape.tape;
            let mut tape = load_tape(path)?;
            tape.alter(&args.name, args.start, args.end)
                .with_context(|| format!("alter field '{}'", args.name))?;
            save_tape(&tape, path)?;
            Ok(TapeResult {
                path: path.clone(),
                tape,
                change: Some(TapeChange::Altered(args.name.clone())),
            })
        }
        TapeCommand::Remove(args) => {
            let path = &args.tape.tape;
            let mut tape = load_tape(path)?;
            let change = if tape.remove(&args.name).is_some() {
                save_tape(&tape, path)?;
                TapeChange::Removed(args.name.clone())
            } else {
                TapeChange::NotFound(args.name.clone())
            };
            Ok(TapeResult {
                path: path.clone(),
                tape,
                change: Some(change),
            })
        }
    }
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let tape = load_tape(&args.tape.tape)?;
    let sink = args
        .output
        .clone()
        .unwrap_or_else(|| args.source.with_extension("csv"));
    if sink == args.source {
        bail!(
            "output {} would overwrite the source; pass --output",
            sink.display()
        );
    }
    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow!("delimiter must be a single ASCII character"))?;
    let options = ConvertOptions::default()
        .with_progress_interval(args.progress)
        .with_delimiter(delimiter);
    let mut progress: Box<dyn ProgressSink> = if args.progress.is_some() {
        Box::new(SpinnerProgress::new(&args.source))
    } else {
        Box::new(NoProgress)
    };
    let summary =
        convert_to_tabular_with_progress(&args.source, &sink, &tape, &options, progress.as_mut())
            .with_context(|| format!("convert {}", args.source.display()))?;
    Ok(ConvertResult {
        source: args.source.clone(),
        summary,
    })
}

pub fn run_infer(args: &InferArgs) -> Result<InferResult> {
    let path = &args.tape.tape;
    let mut tape = load_tape(path)?;
    let options = InferenceOptions::default()
        .with_sample_size(args.sample.sample_size)
        .with_mode(inference_mode(&args.sample));
    let inferred = infer_types_with_options(&mut tape, &args.source, &options)
        .with_context(|| format!("infer types from {}", args.source.display()))?;
    let saved_to = if args.write {
        save_tape(&tape, path)?;
        Some(path.clone())
    } else {
        None
    };
    Ok(InferResult {
        tape,
        inferred,
        saved_to,
    })
}

pub fn run_sql(args: &SqlArgs) -> Result<SqlResult> {
    let mut tape = load_tape(&args.tape.tape)?;
    let typing = if args.no_infer {
        TypingPolicy::DefaultChar
    } else {
        TypingPolicy::Infer {
            sample_size: args.sample.sample_size,
            mode: inference_mode(&args.sample),
        }
    };
    let mut options = SqlScriptOptions::new(&args.source).with_typing(typing);
    if let Some(table) = &args.table {
        options = options.with_table_name(table.as_str());
    }
    let table_name = options.resolved_table_name();
    let script = generate_sql_script(&mut tape, &options)
        .with_context(|| format!("generate SQL for {}", args.source.display()))?;
    if let Some(output) = &args.output {
        write_sql_script(output, &script)?;
    }
    Ok(SqlResult {
        table_name,
        script,
        written_to: args.output.clone(),
    })
}

pub fn run_preview(args: &PreviewArgs) -> Result<PreviewResult> {
    let tape = load_tape(&args.tape.tape)?;
    let rows = read_rows(&args.source, &tape, args.rows)
        .with_context(|| format!("read {}", args.source.display()))?;
    Ok(PreviewResult { tape, rows })
}

fn inference_mode(sample: &SampleArgs) -> InferenceMode {
    if sample.strict {
        InferenceMode::Strict
    } else {
        InferenceMode::Lenient
    }
}

fn load_tape(path: &Path) -> Result<Tape> {
    let tape = Tape::load_file(path).with_context(|| format!("load tape {}", path.display()))?;
    debug!(path = %path.display(), fields = tape.len(), "loaded tape");
    Ok(tape)
}

fn load_or_new_tape(path: &Path) -> Result<Tape> {
    if path.exists() {
        return load_tape(path);
    }
    debug!(path = %path.display(), "tape file not found, starting empty");
    Ok(Tape::new())
}

fn save_tape(tape: &Tape, path: &Path) -> Result<()> {
    tape.save_file(path)
        .with_context(|| format!("save tape {}", path.display()))?;
    info!(path = %path.display(), fields = tape.len(), "saved tape");
    Ok(())
}
