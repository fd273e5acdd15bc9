use crate::model::User;
use crate::views::layout::vertical_layout;

const EXPENSE_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

fn expense_type_options() -> String {
    EXPENSE_TYPES
        .iter()
        .map(|kind| format!("<option value='{kind}'>{kind}</option>"))
        .collect()
}

pub fn new_bill_ui(user: Option<&User>) -> String {
    format!(
        "<div class='layout'>\
           {layout}\
           <div class='content'>\
             <div class='content-header'>\
               <div class='content-title' data-testid='form-title'>Envoyer une note de frais</div>\
             </div>\
             <div class='form-newbill-container'>\
               <form data-testid='form-new-bill'>\
                 <div class='row'>\
                   <div class='col-half'>\
                     <div class='form-group'>\
                       <label for='expense-type'>Type de dépense</label>\
                       <select required class='form-control' data-testid='expense-type'>\
                         {options}\
                       </select>\
                     </div>\
                     <div class='form-group'>\
                       <label for='expense-name'>Nom de la dépense</label>\
                       <input type='text' class='form-control' data-testid='expense-name' placeholder='Vol Paris Londres' />\
                     </div>\
                     <div class='form-group'>\
                       <label for='datepicker'>Date</label>\
                       <input type='date' class='form-control' data-testid='datepicker' />\
                     </div>\
                     <div class='form-group'>\
                       <label for='amount'>Montant TTC</label>\
                       <input type='number' class='form-control' data-testid='amount' placeholder='348' />\
                     </div>\
                     <div class='form-group'>\
                       <label for='vat'>TVA</label>\
                       <input type='number' class='form-control' data-testid='vat' placeholder='70' />\
                       <input type='number' class='form-control' data-testid='pct' placeholder='20' />\
                     </div>\
                   </div>\
                   <div class='col-half'>\
                     <div class='form-group'>\
                       <label for='commentary'>Commentaire</label>\
                       <textarea class='form-control' data-testid='commentary' rows='3'></textarea>\
                     </div>\
                     <div class='form-group'>\
                       <label for='file'>Justificatif</label>\
                       <input type='file' class='form-control' data-testid='file' />\
                       <span class='error-msg' data-testid='errorMsg'></span>\
                     </div>\
                   </div>\
                 </div>\
                 <div class='col-half'>\
                   <button type='submit' id='btn-send-bill' class='btn btn-primary'>Envoyer</button>\
                 </div>\
               </form>\
             </div>\
           </div>\
         </div>",
        layout = vertical_layout(user),
        options = expense_type_options(),
    )
}
