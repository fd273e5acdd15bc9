use std::rc::Rc;

use tracing::{debug, warn};

use crate::Result;
use crate::dom::NodeId;
use crate::model::{BillPayload, BillStatus};
use crate::page::Window;
use crate::router::RoutePath;
use crate::views::bills::{BillsViewState, bills_ui};

pub const FILE_FORMAT_ERROR: &str = "Fichier invalide. Formats acceptés : .jpg, .jpeg, .png";

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Attaches the new-bill handlers: extension check on file selection,
/// payload forwarding on submit.
pub fn install(win: &mut Window) -> Result<()> {
    let file_input = win.get_by_test_id("file")?;
    win.add_listener(
        file_input,
        "change",
        Rc::new(|win: &mut Window, event| handle_change_file(win, event.target)),
    );
    let form = win.get_by_test_id("form-new-bill")?;
    win.add_listener(
        form,
        "submit",
        Rc::new(|win: &mut Window, event| {
            event.prevent_default();
            handle_submit(win, event.current_target)
        }),
    );
    Ok(())
}

fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Extension gate on the selected file. A rejected file stays visible in
/// the input but nothing is forwarded, and any receipt reference recorded
/// by an earlier accepted upload is cleared. An accepted file is uploaded
/// right away; the response is written onto the form for the submit step.
pub fn handle_change_file(win: &mut Window, input: NodeId) -> Result<()> {
    let files = win.files_of(input)?;
    let Some(file) = files.first() else {
        return Ok(());
    };
    let error_node = win.get_by_test_id("errorMsg")?;
    let form = win.get_by_test_id("form-new-bill")?;

    let accepted = extension_of(&file.name)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);
    if !accepted {
        warn!(file_name = %file.name, "rejected upload, bad extension");
        win.set_text(error_node, FILE_FORMAT_ERROR)?;
        win.remove_attr(form, "data-file-url")?;
        win.remove_attr(form, "data-file-name")?;
        win.remove_attr(form, "data-bill-id")?;
        return Ok(());
    }

    win.set_text(error_node, "")?;
    let file_name = file.name.clone();
    win.enqueue(Box::new(move |win| {
        let store = win.store();
        let email = win
            .storage()
            .user()?
            .map(|user| user.email)
            .unwrap_or_default();
        match store.create(&file_name, &email) {
            Ok(receipt) => {
                debug!(file_name, file_url = %receipt.file_url, "receipt uploaded");
                let form = win.get_by_test_id("form-new-bill")?;
                win.set_attr(form, "data-file-url", &receipt.file_url)?;
                win.set_attr(form, "data-file-name", &file_name)?;
                win.set_attr(form, "data-bill-id", &receipt.key)?;
            }
            Err(err) => warn!(%err, "receipt upload failed"),
        }
        Ok(())
    }));
    Ok(())
}

fn field_value(win: &Window, test_id: &str) -> Result<String> {
    let node = win.get_by_test_id(test_id)?;
    win.value_of(node)
}

/// Packages the form fields into a pending bill and forwards it. Empty
/// fields do not block the handler; the backend answer decides whether we
/// land back on the list or on the error page.
pub fn handle_submit(win: &mut Window, form: NodeId) -> Result<()> {
    let email = win
        .storage()
        .user()?
        .map(|user| user.email)
        .unwrap_or_default();
    let payload = BillPayload {
        email,
        bill_type: field_value(win, "expense-type")?,
        name: field_value(win, "expense-name")?,
        amount: field_value(win, "amount")?.parse::<i64>().ok(),
        date: field_value(win, "datepicker")?,
        vat: field_value(win, "vat")?,
        pct: field_value(win, "pct")?.parse::<i64>().unwrap_or(20),
        commentary: field_value(win, "commentary")?,
        file_url: win.attr(form, "data-file-url").unwrap_or_default(),
        file_name: win.attr(form, "data-file-name").unwrap_or_default(),
        status: BillStatus::Pending,
    };
    let bill_id = win.attr(form, "data-bill-id").unwrap_or_default();
    debug!(bill_id, name = %payload.name, "forwarding submission");

    win.enqueue(Box::new(move |win| {
        let store = win.store();
        match store.update(&bill_id, &payload) {
            Ok(_) => win.navigate(RoutePath::Bills),
            Err(err) => {
                warn!(%err, "submission rejected by backend");
                let user = win.storage().user()?;
                let message = err.to_string();
                let markup = bills_ui(&BillsViewState {
                    error: Some(&message),
                    user: user.as_ref(),
                    ..Default::default()
                });
                win.set_body_html(&markup)
            }
        }
    }));
    Ok(())
}
