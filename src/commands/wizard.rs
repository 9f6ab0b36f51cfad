//! Interactive guided flow.
//!
//! Drives [`Wizard`] from a readline prompt: sign in, describe the dataset,
//! review or hand-edit the schema, generate rows, export. Failures are
//! printed inline and the loop carries on; an expired session sends the
//! user back to sign-in. `q`, Ctrl-C, or Ctrl-D quits from any prompt.

use std::path::Path;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::api::ModelType;
use crate::commands::generate::DEFAULT_SCHEMA_FILE;
use crate::commands::{auth, display, AppContext};
use crate::error::{Result, SynthError};
use crate::export::{write_export, ExportFormat};
use crate::workflow::{
    apply_schema_edit, run_data_step, run_schema_step, DataForm, Notification, SchemaForm,
    Wizard, WizardStep, MAX_COLUMN_COUNT, MIN_COLUMN_COUNT, ROW_COUNT_OPTIONS,
};

enum Flow {
    Continue,
    Quit,
}

/// Run the guided flow until the user quits
pub async fn run_wizard(ctx: &AppContext) -> Result<()> {
    tracing::info!("Starting interactive wizard");
    let mut rl = DefaultEditor::new()?;
    let mut wizard = Wizard::new();

    print_banner();
    wizard.start(ctx.credentials().is_authenticated());

    loop {
        let result = match wizard.step() {
            WizardStep::Landing => {
                wizard.start(ctx.credentials().is_authenticated());
                Ok(Flow::Continue)
            }
            WizardStep::Auth => auth_step(&mut rl, ctx, &mut wizard).await,
            WizardStep::Schema => schema_step(&mut rl, ctx, &mut wizard).await,
            WizardStep::Data => data_step(&mut rl, ctx, &mut wizard).await,
            WizardStep::Export => export_step(&mut rl, &mut wizard),
        };

        match result {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                tracing::debug!("Wizard step failed: {:#}", e);
                display::print_error(&e);
                if wizard.handle_error(&e) {
                    println!("Please sign in again.");
                }
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn print_banner() {
    println!("\n{}", "Synthetic data generator".bold());
    println!("Describe a dataset, review its schema, and generate rows.");
    println!("Type q at any prompt to quit.\n");
}

/// Read one trimmed line. `None` means the user wants out.
fn ask(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => {
            let line = line.trim().to_string();
            if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                return Ok(None);
            }
            let _ = rl.add_history_entry(line.as_str());
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_model(input: &str, default: ModelType) -> Result<ModelType> {
    if input.is_empty() {
        return Ok(default);
    }
    Ok(input.parse()?)
}

fn parse_count(input: &str, default: u32, what: &str) -> Result<u32> {
    if input.is_empty() {
        return Ok(default);
    }
    input
        .parse()
        .map_err(|_| SynthError::Validation(format!("{} must be a whole number", what)).into())
}

fn model_prompt(default: ModelType) -> String {
    let options: Vec<&str> = ModelType::ALL.iter().map(|m| m.label()).collect();
    format!("Model [{}] (default {}): ", options.join(" / "), default)
}

async fn auth_step(rl: &mut DefaultEditor, ctx: &AppContext, wizard: &mut Wizard) -> Result<Flow> {
    println!("Sign in with (l)ogin or create an account with (s)ignup.");
    let Some(choice) = ask(rl, "auth> ")? else {
        return Ok(Flow::Quit);
    };

    match choice.as_str() {
        "l" | "login" => {
            let Some(email) = ask(rl, "Email: ")? else {
                return Ok(Flow::Quit);
            };
            let Some(password) = ask(rl, "Password: ")? else {
                return Ok(Flow::Quit);
            };
            auth::login(ctx, &email, &password).await?;
            wizard.authenticated();
        }
        "s" | "signup" => {
            let Some(name) = ask(rl, "Name: ")? else {
                return Ok(Flow::Quit);
            };
            let Some(email) = ask(rl, "Email: ")? else {
                return Ok(Flow::Quit);
            };
            let Some(password) = ask(rl, "Password: ")? else {
                return Ok(Flow::Quit);
            };
            let Some(terms) = ask(rl, "Accept the terms and conditions? [y/N]: ")? else {
                return Ok(Flow::Quit);
            };
            let accepted = terms.eq_ignore_ascii_case("y") || terms.eq_ignore_ascii_case("yes");
            auth::signup(ctx, &name, &email, &password, accepted).await?;
        }
        other => println!("Unknown choice: {}", other),
    }
    Ok(Flow::Continue)
}

async fn schema_step(
    rl: &mut DefaultEditor,
    ctx: &AppContext,
    wizard: &mut Wizard,
) -> Result<Flow> {
    let defaults = &ctx.config.defaults;
    let default_model = defaults.model_type()?;

    println!(
        "\nStep 1: describe your dataset ({} requests remaining today)",
        display::remaining_badge(ctx.tracker.remaining_requests())
    );
    let Some(description) = ask(rl, "Description: ")? else {
        return Ok(Flow::Quit);
    };
    let Some(model) = ask(rl, &model_prompt(default_model))? else {
        return Ok(Flow::Quit);
    };
    let Some(columns) = ask(
        rl,
        &format!(
            "Columns {}-{} (default {}): ",
            MIN_COLUMN_COUNT, MAX_COLUMN_COUNT, defaults.column_count
        ),
    )?
    else {
        return Ok(Flow::Quit);
    };

    let form = SchemaForm {
        description,
        model: Some(parse_model(&model, default_model)?),
        column_count: parse_count(&columns, defaults.column_count, "Columns")?,
    };

    println!("Generating schema...");
    let outcome = run_schema_step(&ctx.client, &ctx.tracker, &form).await?;
    display::print_notifications(&outcome.notifications);
    display::print_schema(&outcome.response);
    wizard.update_schema(outcome.response);

    loop {
        let Some(choice) = ask(
            rl,
            "(c)ontinue to data, (e)dit schema JSON, (r)egenerate: ",
        )?
        else {
            return Ok(Flow::Quit);
        };

        match choice.as_str() {
            "c" | "continue" | "" => {
                if let Some(schema) = wizard.schema().cloned() {
                    wizard.schema_ready(schema);
                }
                return Ok(Flow::Continue);
            }
            "e" | "edit" => {
                if edit_schema(rl, wizard, Path::new(DEFAULT_SCHEMA_FILE))?.is_none() {
                    return Ok(Flow::Quit);
                }
            }
            "r" | "regenerate" => return Ok(Flow::Continue),
            other => println!("Unknown choice: {}", other),
        }
    }
}

/// Round-trip the current schema through a file the user edits.
/// Returns `None` if the user quit.
fn edit_schema(rl: &mut DefaultEditor, wizard: &mut Wizard, path: &Path) -> Result<Option<()>> {
    let Some(schema) = wizard.schema() else {
        return Ok(Some(()));
    };
    std::fs::write(path, serde_json::to_string_pretty(schema)?)?;
    println!(
        "Schema written to {}. Edit it, then press Enter to reload.",
        path.display()
    );
    if ask(rl, "")?.is_none() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(path)?;
    match apply_schema_edit(&text) {
        Ok(edited) => {
            display::print_notifications(&[Notification::success("Schema updated.")]);
            display::print_schema(&edited);
            wizard.update_schema(edited);
        }
        Err(e) => {
            display::print_error(&e);
            println!("Keeping the previous schema.");
        }
    }
    Ok(Some(()))
}

async fn data_step(rl: &mut DefaultEditor, ctx: &AppContext, wizard: &mut Wizard) -> Result<Flow> {
    let Some(schema) = wizard.schema().cloned() else {
        wizard.back();
        return Ok(Flow::Continue);
    };
    let defaults = &ctx.config.defaults;
    let default_model = defaults.model_type()?;

    println!(
        "\nStep 2: generate rows for {} columns (b to go back)",
        schema.schema.len()
    );
    let Some(model) = ask(rl, &model_prompt(default_model))? else {
        return Ok(Flow::Quit);
    };
    if model == "b" {
        wizard.back();
        return Ok(Flow::Continue);
    }

    let options: Vec<String> = ROW_COUNT_OPTIONS.iter().map(u32::to_string).collect();
    let Some(rows) = ask(
        rl,
        &format!(
            "Rows [{}] (default {}): ",
            options.join("/"),
            defaults.row_count
        ),
    )?
    else {
        return Ok(Flow::Quit);
    };

    let form = DataForm {
        model: Some(parse_model(&model, default_model)?),
        row_count: parse_count(&rows, defaults.row_count, "Rows")?,
    };

    println!("Generating data... this can take a few minutes.");
    let outcome = run_data_step(&ctx.client, &ctx.tracker, &schema, &form).await?;
    display::print_notifications(&outcome.notifications);
    display::print_rows_preview(&outcome.response.data);
    wizard.data_ready(outcome.response);
    Ok(Flow::Continue)
}

fn export_step(rl: &mut DefaultEditor, wizard: &mut Wizard) -> Result<Flow> {
    let Some(choice) = ask(
        rl,
        "Download (j)son or (c)sv, go (b)ack, or start a (n)ew schema: ",
    )?
    else {
        return Ok(Flow::Quit);
    };

    let format = match choice.as_str() {
        "j" | "json" => ExportFormat::Json,
        "c" | "csv" => ExportFormat::Csv,
        "b" | "back" => {
            wizard.back();
            return Ok(Flow::Continue);
        }
        "n" | "new" => {
            wizard.back();
            wizard.back();
            return Ok(Flow::Continue);
        }
        other => {
            println!("Unknown choice: {}", other);
            return Ok(Flow::Continue);
        }
    };

    if let Some(data) = wizard.data() {
        let path = Path::new(format.default_file_name());
        write_export(&data.data, format, path)?;
        display::print_notifications(&[Notification::success(format!(
            "Your {} file was saved to {}.",
            format.to_string().to_uppercase(),
            path.display()
        ))]);
    }
    Ok(Flow::Continue)
}
