use colored::*;

use crate::commands::ToolArgs;
use crate::mprint;
use crate::terminal::print;
use sshprobe_common::config::ToolPaths;
use sshprobe_common::{success, warn};
use sshprobe_core::system::{Tool, ToolInventory};

type Detail = (String, ColoredString);

pub async fn tools(args: ToolArgs) -> anyhow::Result<()> {
    let paths: ToolPaths = args.into();
    let inventory = ToolInventory::detect(&paths).await;

    for (idx, tool) in inventory.tools().into_iter().enumerate() {
        print::tree_head(idx, tool.name);
        print::as_tree_one_level(tool_details(tool));
        mprint!();
    }

    match (inventory.ssh.available, inventory.sshpass.available, inventory.expect.available) {
        (false, _, _) => warn!("ssh is missing: every login check will fail with SSH_ERROR"),
        (true, true, _) => success!("Key and password logins are supported"),
        (true, false, true) => success!("Password logins will use the expect fallback"),
        (true, false, false) => warn!("Install sshpass or expect to check password logins"),
    }
    Ok(())
}

fn tool_details(tool: &Tool) -> Vec<Detail> {
    let status = if tool.available {
        "available".green().bold()
    } else {
        "missing".red().bold()
    };
    vec![
        ("Path".to_string(), tool.path.display().to_string().normal()),
        ("Status".to_string(), status),
    ]
}
