use std::rc::Rc;

use tracing::debug;

use crate::Result;
use crate::dom::NodeId;
use crate::format::format_date;
use crate::model::Bill;
use crate::page::Window;
use crate::router::RoutePath;

/// Attaches the bills-page handlers: the "new bill" button and one click
/// handler per receipt eye icon.
pub fn install(win: &mut Window) -> Result<()> {
    if let Ok(button) = win.get_by_test_id("btn-new-bill") {
        win.add_listener(
            button,
            "click",
            Rc::new(|win: &mut Window, _event| handle_click_new_bill(win)),
        );
    }
    for icon in win.select_all("[data-testid='icon-eye']")? {
        win.add_listener(
            icon,
            "click",
            Rc::new(move |win: &mut Window, _event| handle_click_icon_eye(win, icon)),
        );
    }
    Ok(())
}

pub fn handle_click_new_bill(win: &mut Window) -> Result<()> {
    debug!("new bill button clicked");
    win.navigate(RoutePath::NewBill)
}

/// Opens the receipt modal on the clicked row's image URL. The image is
/// fitted to half the modal's declared width.
pub fn handle_click_icon_eye(win: &mut Window, icon: NodeId) -> Result<()> {
    let bill_url = win.attr(icon, "data-bill-url").unwrap_or_default();
    let modal = win.select_one("#modaleFile")?;
    let img_width = win
        .attr(modal, "data-width")
        .and_then(|width| width.parse::<u32>().ok())
        .unwrap_or(800)
        / 2;
    let body = win.select_one("#modaleFile .modal-body")?;
    win.set_node_inner_html(
        body,
        &format!(
            "<div class='bill-proof-container'>\
               <img width='{img_width}' src='{bill_url}' alt='Bill' />\
             </div>"
        ),
    )?;
    win.add_class(modal, "show")
}

/// Display pass over fetched bills: dates go to their French short form,
/// unparseable dates stay raw. Ordering is left to the view.
pub fn format_bills(bills: Vec<Bill>) -> Vec<Bill> {
    bills
        .into_iter()
        .map(|mut bill| {
            bill.date = format_date(&bill.date);
            bill
        })
        .collect()
}
