//! The four canonical seed bills. Deliberately out of date order so that
//! list rendering has something to sort.

use crate::model::{Bill, BillStatus};

pub fn bills() -> Vec<Bill> {
    vec![
        Bill {
            id: "47qAXb6fIm2zOKkLzMro".into(),
            bill_type: "Hôtel et logement".into(),
            name: "encore".into(),
            email: "a@a".into(),
            amount: 400,
            date: "2004-04-04".into(),
            vat: "80".into(),
            pct: 20,
            status: BillStatus::Pending,
            commentary: "séminaire billed".into(),
            file_url: "https://test.storage.tld/v0/b/billable-677b6.a…f-1.jpg?alt=media&token=c1640e12-a24b-4b11-ae52-529112e9602a".into(),
            file_name: "preview-facture-free-201801-pdf-1.jpg".into(),
        },
        Bill {
            id: "BeKy5Mo4jkmdfPGYpTxZ".into(),
            bill_type: "Transports".into(),
            name: "test1".into(),
            email: "a@a".into(),
            amount: 100,
            date: "2001-01-01".into(),
            vat: "".into(),
            pct: 20,
            status: BillStatus::Refused,
            commentary: "plop".into(),
            file_url: "https://test.storage.tld/v0/b/billable-677b6.a…61.jpeg?alt=media&token=7e280df1-1150-4a04-9f4b-5d9afd26327b".into(),
            file_name: "1592770761.jpeg".into(),
        },
        Bill {
            id: "UIUZtnPQvnbFnB0ozvJh".into(),
            bill_type: "Services en ligne".into(),
            name: "test3".into(),
            email: "a@a".into(),
            amount: 300,
            date: "2003-03-03".into(),
            vat: "60".into(),
            pct: 20,
            status: BillStatus::Accepted,
            commentary: "".into(),
            file_url: "https://test.storage.tld/v0/b/billable-677b6.a…dur.png?alt=media&token=571d34cb-9c8f-430a-af52-66221cae1da3".into(),
            file_name: "facture-client-php-exportee-dans-document-pdf.png".into(),
        },
        Bill {
            id: "qcCK3SzECmaZAGRrHjaC".into(),
            bill_type: "Restaurants et bars".into(),
            name: "test2".into(),
            email: "a@a".into(),
            amount: 200,
            date: "2002-02-02".into(),
            vat: "40".into(),
            pct: 20,
            status: BillStatus::Refused,
            commentary: "test2".into(),
            file_url: "https://test.storage.tld/v0/b/billable-677b6.a…f-1.jpg?alt=media&token=4df6ed2c-12c8-42a2-b013-346c1346f732".into(),
            file_name: "preview-facture-free-201801-pdf-1.jpg".into(),
        },
    ]
}
