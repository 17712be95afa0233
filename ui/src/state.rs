use std::sync::Arc;

use backoffice_business::{
    AuthProvider, BackendApi, BusinessConfig, CredentialChangeController, FlagKind, FlagSync,
    NotificationCenter, SessionContext,
};
use log::info;
use ustr::Ustr;

/// The three flag controls of one invoice row.
pub struct InvoiceRow {
    pub id: Ustr,
    pub checked: FlagSync,
    pub published: FlagSync,
    pub paid: FlagSync,
}

/// The main application state.
pub struct State {
    pub config: BusinessConfig,
    pub session: SessionContext,
    pub auth: Arc<dyn AuthProvider>,
    /// Receives every notification raised by the dialog and the flag controls.
    pub center: NotificationCenter,
    /// The open credential dialog, if any. Dropping it discards in-flight results.
    pub dialog: Option<CredentialChangeController>,
    pub invoices: Vec<InvoiceRow>,
}

impl State {
    pub fn new(config: BusinessConfig, session: SessionContext, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            config,
            session,
            auth,
            center: NotificationCenter::new(),
            dialog: None,
            invoices: Vec::new(),
        }
    }

    pub fn test(base_url: String, uid: &str, auth: Arc<dyn AuthProvider>) -> Self {
        Self::new(BusinessConfig::new(base_url), SessionContext::new(uid), auth)
    }

    pub fn open_credential_dialog(&mut self) {
        if self.dialog.is_some() {
            return;
        }
        info!("Opening credential dialog for {}", self.session.uid);
        self.dialog = Some(CredentialChangeController::mount(
            self.session.clone(),
            self.config.clone(),
            self.auth.clone(),
            self.center.notifier(),
        ));
    }

    pub fn close_credential_dialog(&mut self) {
        if self.dialog.take().is_some() {
            info!("Closed credential dialog");
        }
    }

    pub fn add_invoice(&mut self, id: &str, checked: bool, published: bool, paid: bool) {
        let id = Ustr::from(id);
        let backend = BackendApi::new(&self.config);
        let flag = |kind, value| {
            FlagSync::new(kind, id, value, backend.clone(), self.center.notifier())
        };

        let row = InvoiceRow {
            id,
            checked: flag(FlagKind::Checked, checked),
            published: flag(FlagKind::Published, published),
            paid: flag(FlagKind::Paid, paid),
        };
        self.invoices.push(row);
    }
}
