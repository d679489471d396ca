//! Running-config snapshot to flash.

use log::{debug, info};

use crate::device::DeviceSession;
use crate::driver::{Dialog, Statement};
use crate::error::{ChannelError, Result};

/// Question IOS asks before writing the copy.
pub const DESTINATION_PROMPT: &str = r"Destination filename \[(.*)\]\?";

/// `flash:sh-run-<date>.txt`
pub fn filename(date: &str) -> String {
    format!("flash:sh-run-{date}.txt")
}

pub fn command(date: &str) -> String {
    format!("copy running-config {}", filename(date))
}

/// Accepts the default destination name with an empty line.
pub fn dialog() -> Result<Dialog> {
    let statement = Statement::new(DESTINATION_PROMPT)
        .map_err(ChannelError::from)?
        .action(|hit| {
            debug!("accepting destination {:?}", hit.group(1).unwrap_or_default());
            Some(String::new())
        })
        .loop_continue(true)
        .continue_timer(false);
    Ok(Dialog::new(vec![statement]))
}

/// Copy the running config to flash. Returns the file written.
pub async fn save<D: DeviceSession>(device: Option<&mut D>, date: &str) -> Result<Option<String>> {
    let Some(device) = device else {
        return Ok(None);
    };
    let dialog = dialog()?;
    device.connect().await?;
    device.execute_dialog(&command(date), &dialog).await?;

    let file = filename(date);
    info!("{}: saved running-config to {}", device.name(), file);
    Ok(Some(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::StatementMatch;
    use crate::tasks::mock::ScriptedDevice;

    #[test]
    fn test_command() {
        assert_eq!(
            command("2024-05-01"),
            "copy running-config flash:sh-run-2024-05-01.txt"
        );
    }

    #[test]
    fn test_dialog_statement() {
        let dialog = dialog().unwrap();
        let statement = &dialog.statements()[0];
        assert!(statement.keeps_looping());
        assert!(!statement.keeps_timer());

        let hit = StatementMatch::find(
            statement.pattern(),
            b"Destination filename [sh-run-2024-05-01.txt]? ",
        )
        .unwrap();
        assert_eq!(hit.group(1), Some("sh-run-2024-05-01.txt"));
        assert_eq!(statement.respond(&hit), Some(String::new()));
    }

    #[tokio::test]
    async fn test_save_answers_prompt() {
        let command = "copy running-config flash:sh-run-2024-05-01.txt";
        let mut device = ScriptedDevice::new("sw1")
            .with_question(command, "Destination filename [sh-run-2024-05-01.txt]?")
            .with_output(command, "4538 bytes copied in 0.120 secs");
        let file = save(Some(&mut device), "2024-05-01").await.unwrap();
        assert_eq!(file.as_deref(), Some("flash:sh-run-2024-05-01.txt"));
        assert_eq!(device.replies, vec![String::new()]);
        assert_eq!(device.executed, vec![command.to_string()]);
    }

    #[tokio::test]
    async fn test_absent_device() {
        assert_eq!(save::<ScriptedDevice>(None, "2024-05-01").await.unwrap(), None);
    }
}
