use std::path::Path;

use promptvars_core::convert::DataConverter;
use promptvars_core::transfer::ExportFormat;
use promptvars_core::vars::VariableMap;

use super::{import_file, load_config, open_variables, transfer, unwrap_result, var_map};
use crate::{ConvertArgs, TargetFormat};

impl From<TargetFormat> for ExportFormat {
    fn from(f: TargetFormat) -> Self {
        match f {
            TargetFormat::Standard => ExportFormat::Standard,
            TargetFormat::Openai => ExportFormat::OpenAi,
            TargetFormat::Conversation => ExportFormat::Conversation,
            TargetFormat::Template => ExportFormat::Template,
        }
    }
}

pub async fn run(config: Option<&Path>, args: &ConvertArgs) {
    let rc = load_config(config, "convert");
    let mut data = import_file(&rc, &args.file, "convert").await;

    let mut vars = VariableMap::new();
    if args.resolve {
        vars.extend(open_variables(&rc, "convert").await.custom_variables().clone());
    }
    vars.extend(var_map(&args.vars));
    if !vars.is_empty() {
        data = unwrap_result(DataConverter::new().apply_variables(&data, &vars), "convert");
    }

    let format = ExportFormat::from(args.to);
    let manager = transfer(&rc);
    if args.save || args.out.is_some() {
        let result = manager.export_to_file(&data, format, args.out.as_deref()).await;
        let path = unwrap_result(result, "convert");
        println!("OK   wrote {}", path.display());
        return;
    }

    let rendered = unwrap_result(manager.render_export(&data, format), "convert");
    println!("{rendered}");
}
