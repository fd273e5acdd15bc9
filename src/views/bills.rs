use crate::format::format_status;
use crate::model::{Bill, User};
use crate::views::layout::{error_page, loading_page, vertical_layout};

/// What the bills page renders. Loading wins over error, error over data.
#[derive(Debug, Default)]
pub struct BillsViewState<'a> {
    pub data: &'a [Bill],
    pub loading: bool,
    pub error: Option<&'a str>,
    pub user: Option<&'a User>,
}

/// Rows in descending date order, most recent first. The comparison is
/// lexicographic on the raw date field, so chronological order is only
/// guaranteed for zero-padded YYYY-MM-DD dates; ties keep input order.
fn rows(bills: &[Bill]) -> String {
    let mut ordered = bills.iter().collect::<Vec<_>>();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered.iter().map(|bill| row(bill)).collect()
}

fn row(bill: &Bill) -> String {
    format!(
        "<tr>\
           <td>{}</td>\
           <td>{}</td>\
           <td>{}</td>\
           <td>{} €</td>\
           <td>{}</td>\
           <td>{}</td>\
         </tr>",
        bill.bill_type,
        bill.name,
        bill.date,
        bill.amount,
        format_status(bill.status),
        actions(&bill.file_url),
    )
}

fn actions(file_url: &str) -> String {
    format!(
        "<div class='icon-actions'>\
           <div id='eye' data-testid='icon-eye' data-bill-url='{file_url}'></div>\
         </div>"
    )
}

fn modal() -> &'static str {
    "<div class='modal fade' id='modaleFile' data-testid='modaleFile' data-width='800' role='dialog' aria-hidden='true'>\
       <div class='modal-dialog modal-dialog-centered' role='document'>\
         <div class='modal-content'>\
           <div class='modal-header'>\
             <h5 class='modal-title'>Justificatif</h5>\
             <button type='button' class='close' data-dismiss='modal' aria-label='Close'>\
               <span aria-hidden='true'>&times;</span>\
             </button>\
           </div>\
           <div class='modal-body'></div>\
         </div>\
       </div>\
     </div>"
}

pub fn bills_ui(state: &BillsViewState<'_>) -> String {
    if state.loading {
        return loading_page();
    }
    if let Some(error) = state.error {
        return error_page(error);
    }
    format!(
        "<div class='layout'>\
           {layout}\
           <div class='content'>\
             <div class='content-header'>\
               <div class='content-title'>Mes notes de frais</div>\
               <button type='button' data-testid='btn-new-bill' class='btn btn-primary'>Nouvelle note de frais</button>\
             </div>\
             <div id='data-table'>\
               <table id='example' class='table table-striped'>\
                 <thead>\
                   <tr>\
                     <th>Type</th>\
                     <th>Nom</th>\
                     <th>Date</th>\
                     <th>Montant</th>\
                     <th>Statut</th>\
                     <th>Actions</th>\
                   </tr>\
                 </thead>\
                 <tbody data-testid='tbody'>{rows}</tbody>\
               </table>\
             </div>\
           </div>\
           {modal}\
         </div>",
        layout = vertical_layout(state.user),
        rows = rows(state.data),
        modal = modal(),
    )
}
