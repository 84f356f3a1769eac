const XERO_WEB_URL: &str = "https://go.xero.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLinkKind {
    Invoice,
    Bill,
    CreditNote,
    BankTransaction,
    ManualJournal,
    Contact,
}

impl DeepLinkKind {
    /// ACCPAY invoices are bills and open on the payables screen.
    pub fn for_invoice_type(kind: Option<&str>) -> Self {
        match kind {
            Some("ACCPAY") => DeepLinkKind::Bill,
            _ => DeepLinkKind::Invoice,
        }
    }
}

pub fn deep_link(kind: DeepLinkKind, id: &str, short_code: Option<&str>) -> String {
    let id = urlencoding::encode(id);
    let redirect = match kind {
        DeepLinkKind::Invoice => format!("/AccountsReceivable/View.aspx?InvoiceID={id}"),
        DeepLinkKind::Bill => format!("/AccountsPayable/View.aspx?InvoiceID={id}"),
        DeepLinkKind::CreditNote => {
            format!("/AccountsReceivable/ViewCreditNote.aspx?creditNoteID={id}")
        }
        DeepLinkKind::BankTransaction => {
            format!("/Bank/ViewTransaction.aspx?bankTransactionID={id}")
        }
        DeepLinkKind::ManualJournal => format!("/Journal/View.aspx?invoiceID={id}"),
        DeepLinkKind::Contact => format!("/Contacts/View/{id}"),
    };

    match short_code.filter(|code| !code.trim().is_empty()) {
        Some(code) => format!(
            "{XERO_WEB_URL}/organisationlogin/default.aspx?shortcode={}&redirecturl={}",
            urlencoding::encode(code),
            urlencoding::encode(&redirect)
        ),
        None => format!("{XERO_WEB_URL}{redirect}"),
    }
}
