use anyhow::Result;
use serde_json::Value;

use super::Project;
use crate::Context;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let project = Project::load(ctx)?;
    let environ = &project.environ;

    ui::header(&format!("Environment {}", environ.path.display()));
    ui::kv("code", &environ.code);
    ui::kv("srcdir", environ.srcdir.as_deref().unwrap_or("(none)"));

    if !environ.params.is_empty() {
        ui::section("Parameters");
        for (name, value) in &environ.params {
            ui::kv(name, value);
        }
    }

    let mut connect = project.settings.connect.to_map();
    connect.extend(environ.connect.clone());
    if !connect.is_empty() {
        ui::section("Connect");
        for (key, value) in &connect {
            ui::kv(key, &connect_value(key, value));
        }
    }

    project.space.show(&mut ui::TermDisplay);
    Ok(())
}

fn connect_value(key: &str, value: &Value) -> String {
    match value {
        _ if key == "password" => "*****".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connect_value_masks_password() {
        assert_eq!(connect_value("password", &json!("admin")), "*****");
        assert_eq!(connect_value("host", &json!("localhost")), "localhost");
        assert_eq!(connect_value("manage-port", &json!(8002)), "8002");
    }
}
