use clap::Args;
use recruit_portal::error::AppError;
use recruit_portal::forms::{
    ApplicationValueSet, AssemblyOptions, FieldDefinition, FormAssessment, FormSchema,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct FormCheckArgs {
    /// JSON file holding an array of field definitions
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct FormEvaluateArgs {
    /// JSON file holding an array of field definitions
    pub(crate) form: PathBuf,
    /// JSON object mapping field ids to raw answers
    pub(crate) values: PathBuf,
    /// Enforce required fields as a submission would
    #[arg(long)]
    pub(crate) strict: bool,
}

pub(crate) fn run_check(args: FormCheckArgs) -> Result<(), AppError> {
    let schema = load_schema(&args.file)?;
    println!("{}", describe(&schema));
    Ok(())
}

pub(crate) fn run_evaluate(args: FormEvaluateArgs) -> Result<(), AppError> {
    let schema = load_schema(&args.form)?;
    let values: ApplicationValueSet = serde_json::from_str(&fs::read_to_string(&args.values)?)?;
    let assessment = evaluate(&schema, &values, args.strict);
    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}

fn load_schema(path: &Path) -> Result<FormSchema, AppError> {
    let raw = fs::read_to_string(path)?;
    let definitions: Vec<FieldDefinition> = serde_json::from_str(&raw)?;
    Ok(FormSchema::build(definitions)?)
}

fn evaluate(schema: &FormSchema, values: &ApplicationValueSet, strict: bool) -> FormAssessment {
    let options = if strict {
        AssemblyOptions::strict()
    } else {
        AssemblyOptions::lenient()
    };
    schema.assess(values, options)
}

fn describe(schema: &FormSchema) -> String {
    let mut lines = vec![format!("form is valid: {} field(s)", schema.len())];
    for field in schema.fields() {
        let mut line = format!(
            "  {:>3}  {} ({}, {:?})",
            field.sort_order, field.label, field.id, field.field_type
        );
        if field.required {
            line.push_str(" required");
        }
        if let Some(rule) = &field.visibility {
            line.push_str(&format!(
                " when {} {:?} {:?}",
                rule.depends_on, rule.condition, rule.value
            ));
        }
        lines.push(line);
    }
    lines.join("\n")
}
