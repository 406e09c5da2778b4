//! Record store: read/write traits per entity and their Diesel implementation.

use chrono::{NaiveDate, NaiveDateTime};

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::communication::{Communication, NewCommunication, UpdateCommunication};
use crate::domain::contract::{Contract, NewContract, ScheduledInstallment, UpdateContract};
use crate::domain::delinquency::{
    DelinquencyRecord, NewDelinquencyRecord, UpdateDelinquencyRecord,
};
use crate::domain::installment::Installment;
use crate::domain::interaction::{Interaction, NewInteraction, UpdateInteraction};
use crate::domain::invoice::{Invoice, NewInvoice, UpdateInvoice};
use crate::domain::lot::{Lot, LotStatus, NewLot, UpdateLot};
use crate::domain::price_adjustment::{NewPriceAdjustment, PriceAdjustment};
use crate::domain::trigger::{NewTriggerConfig, TriggerConfig};
use crate::domain::types::{
    ClientId, CommunicationId, ContractId, DelinquencyId, Email, InstallmentId, InteractionId,
    InvoiceId, LotId, PriceAdjustmentId, UserId,
};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::repository::errors::RepositoryResult;

pub mod client;
pub mod communication;
pub mod contract;
pub mod delinquency;
pub mod errors;
pub mod interaction;
pub mod invoice;
pub mod lot;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod price_adjustment;
pub mod trigger;
pub mod user;

/// Diesel-backed store shared by every handler.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub(crate) fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub(crate) fn offset(&self) -> i64 {
        (self.page.max(1) - 1) as i64 * self.per_page as i64
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct LotListQuery {
    pub status: Option<LotStatus>,
    pub pagination: Option<Pagination>,
}

impl LotListQuery {
    pub fn status(mut self, status: LotStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContractListQuery {
    pub client_id: Option<ClientId>,
    pub pagination: Option<Pagination>,
}

impl ContractListQuery {
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceListQuery {
    pub contract_id: Option<ContractId>,
    pub status: Option<String>,
    pub pagination: Option<Pagination>,
}

impl InvoiceListQuery {
    pub fn contract(mut self, contract_id: ContractId) -> Self {
        self.contract_id = Some(contract_id);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DelinquencyListQuery {
    pub status: Option<String>,
    pub pagination: Option<Pagination>,
}

impl DelinquencyListQuery {
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct PriceAdjustmentListQuery {
    pub contract_id: Option<ContractId>,
    pub pagination: Option<Pagination>,
}

impl PriceAdjustmentListQuery {
    pub fn contract(mut self, contract_id: ContractId) -> Self {
        self.contract_id = Some(contract_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Listing of communications or interactions, optionally for one client.
#[derive(Debug, Clone, Default)]
pub struct ClientHistoryQuery {
    pub client_id: Option<ClientId>,
    pub pagination: Option<Pagination>,
}

impl ClientHistoryQuery {
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    fn count_clients(&self) -> RepositoryResult<i64>;
    /// Clients that hold at least one contract.
    fn list_client_ids_with_contracts(&self) -> RepositoryResult<Vec<ClientId>>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    /// Inserts every client or none.
    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize>;
    fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
    fn delete_client(&self, id: ClientId) -> RepositoryResult<()>;
}

pub trait LotReader {
    fn get_lot_by_id(&self, id: LotId) -> RepositoryResult<Option<Lot>>;
    fn list_lots(&self, query: LotListQuery) -> RepositoryResult<(usize, Vec<Lot>)>;
    /// Counts every lot, or only those with `status`.
    fn count_lots(&self, status: Option<LotStatus>) -> RepositoryResult<i64>;
}

pub trait LotWriter {
    fn create_lot(&self, new_lot: &NewLot) -> RepositoryResult<Lot>;
    fn update_lot(&self, id: LotId, updates: &UpdateLot) -> RepositoryResult<Lot>;
    fn delete_lot(&self, id: LotId) -> RepositoryResult<()>;
}

pub trait ContractReader {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<Contract>>;
    fn list_contracts(&self, query: ContractListQuery)
    -> RepositoryResult<(usize, Vec<Contract>)>;
    fn count_contracts(&self) -> RepositoryResult<i64>;
    /// Sum of `valor_total`; `None` when there is nothing to sum.
    fn sum_contract_values(&self) -> RepositoryResult<Option<f64>>;
    fn get_installment_by_id(&self, id: InstallmentId) -> RepositoryResult<Option<Installment>>;
    /// Installments of one contract ordered by number.
    fn list_installments(&self, contract_id: ContractId) -> RepositoryResult<Vec<Installment>>;
    /// Installments of every contract held by the client.
    fn list_client_installments(&self, client_id: ClientId)
    -> RepositoryResult<Vec<Installment>>;
}

pub trait ContractWriter {
    /// Inserts the contract and its schedule in one transaction.
    fn create_contract(
        &self,
        new_contract: &NewContract,
        schedule: &[ScheduledInstallment],
    ) -> RepositoryResult<(Contract, Vec<Installment>)>;
    fn update_contract(
        &self,
        id: ContractId,
        updates: &UpdateContract,
    ) -> RepositoryResult<Contract>;
    fn delete_contract(&self, id: ContractId) -> RepositoryResult<()>;
    /// Marks the installment and any boleto issued for it as paid.
    fn pay_installment(
        &self,
        id: InstallmentId,
        data_pagamento: NaiveDate,
    ) -> RepositoryResult<Installment>;
}

pub trait InvoiceReader {
    fn get_invoice_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>>;
    fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)>;
}

pub trait InvoiceWriter {
    fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice>;
    fn update_invoice(&self, id: InvoiceId, updates: &UpdateInvoice) -> RepositoryResult<Invoice>;
    fn delete_invoice(&self, id: InvoiceId) -> RepositoryResult<()>;
}

pub trait DelinquencyReader {
    fn get_delinquency_by_id(&self, id: DelinquencyId)
    -> RepositoryResult<Option<DelinquencyRecord>>;
    fn get_delinquency_by_client(
        &self,
        client_id: ClientId,
    ) -> RepositoryResult<Option<DelinquencyRecord>>;
    fn list_delinquencies(
        &self,
        query: DelinquencyListQuery,
    ) -> RepositoryResult<(usize, Vec<DelinquencyRecord>)>;
    /// Number of stored snapshots with `status`.
    fn count_delinquencies(&self, status: &str) -> RepositoryResult<i64>;
    /// Sum of `valor_em_aberto` over snapshots with `status`.
    fn sum_open_amounts(&self, status: &str) -> RepositoryResult<Option<f64>>;
}

pub trait DelinquencyWriter {
    fn create_delinquency(&self, record: &NewDelinquencyRecord)
    -> RepositoryResult<DelinquencyRecord>;
    /// Inserts or refreshes the computed fields of the client's snapshot,
    /// keeping the follow-up fields already stored.
    fn upsert_delinquency(&self, record: &NewDelinquencyRecord)
    -> RepositoryResult<DelinquencyRecord>;
    fn update_delinquency(
        &self,
        id: DelinquencyId,
        updates: &UpdateDelinquencyRecord,
    ) -> RepositoryResult<DelinquencyRecord>;
    fn delete_delinquency(&self, id: DelinquencyId) -> RepositoryResult<()>;
    /// Sets `ultimo_contato` on the client's snapshot; returns rows touched.
    fn record_last_contact(
        &self,
        client_id: ClientId,
        contacted_at: NaiveDateTime,
    ) -> RepositoryResult<usize>;
}

pub trait PriceAdjustmentReader {
    fn get_price_adjustment_by_id(
        &self,
        id: PriceAdjustmentId,
    ) -> RepositoryResult<Option<PriceAdjustment>>;
    fn list_price_adjustments(
        &self,
        query: PriceAdjustmentListQuery,
    ) -> RepositoryResult<(usize, Vec<PriceAdjustment>)>;
}

pub trait PriceAdjustmentWriter {
    fn create_price_adjustment(
        &self,
        new_adjustment: &NewPriceAdjustment,
    ) -> RepositoryResult<PriceAdjustment>;
    /// Rewrites the stored record with an already merged value.
    fn save_price_adjustment(&self, adjustment: &PriceAdjustment)
    -> RepositoryResult<PriceAdjustment>;
    /// Saves the applied record and scales the corrected value of every
    /// unpaid installment from the reference number on. Returns the saved
    /// record and the number of installments changed.
    fn apply_price_adjustment(
        &self,
        adjustment: &PriceAdjustment,
    ) -> RepositoryResult<(PriceAdjustment, usize)>;
    fn delete_price_adjustment(&self, id: PriceAdjustmentId) -> RepositoryResult<()>;
}

pub trait TriggerReader {
    /// Stored configuration; the default schedule when none was saved.
    fn get_trigger_config(&self) -> RepositoryResult<TriggerConfig>;
}

pub trait TriggerWriter {
    /// Replaces every trigger and the schedule in one transaction.
    fn replace_trigger_config(&self, config: &NewTriggerConfig) -> RepositoryResult<TriggerConfig>;
}

pub trait CommunicationReader {
    fn get_communication_by_id(
        &self,
        id: CommunicationId,
    ) -> RepositoryResult<Option<Communication>>;
    fn list_communications(
        &self,
        query: ClientHistoryQuery,
    ) -> RepositoryResult<(usize, Vec<Communication>)>;
}

pub trait CommunicationWriter {
    fn create_communication(
        &self,
        new_communication: &NewCommunication,
    ) -> RepositoryResult<Communication>;
    fn update_communication(
        &self,
        id: CommunicationId,
        updates: &UpdateCommunication,
    ) -> RepositoryResult<Communication>;
    fn delete_communication(&self, id: CommunicationId) -> RepositoryResult<()>;
}

pub trait InteractionReader {
    fn get_interaction_by_id(&self, id: InteractionId) -> RepositoryResult<Option<Interaction>>;
    fn list_interactions(
        &self,
        query: ClientHistoryQuery,
    ) -> RepositoryResult<(usize, Vec<Interaction>)>;
}

pub trait InteractionWriter {
    fn create_interaction(&self, new_interaction: &NewInteraction)
    -> RepositoryResult<Interaction>;
    fn update_interaction(
        &self,
        id: InteractionId,
        updates: &UpdateInteraction,
    ) -> RepositoryResult<Interaction>;
    fn delete_interaction(&self, id: InteractionId) -> RepositoryResult<()>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
    fn list_users(&self) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, id: UserId, updates: &UpdateUser) -> RepositoryResult<User>;
    fn delete_user(&self, id: UserId) -> RepositoryResult<()>;
}
