//! Mock repository implementations for isolating services in tests.

use chrono::{NaiveDate, NaiveDateTime};
use mockall::mock;

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
use crate::repository::{
    ClientHistoryQuery, ClientListQuery, ClientReader, ClientWriter, CommunicationReader,
    CommunicationWriter, ContractListQuery, ContractReader, ContractWriter, DelinquencyListQuery,
    DelinquencyReader, DelinquencyWriter, InteractionReader, InteractionWriter, InvoiceListQuery,
    InvoiceReader, InvoiceWriter, LotListQuery, LotReader, LotWriter, PriceAdjustmentListQuery,
    PriceAdjustmentReader, PriceAdjustmentWriter, TriggerReader, TriggerWriter, UserReader,
    UserWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
        fn count_clients(&self) -> RepositoryResult<i64>;
        fn list_client_ids_with_contracts(&self) -> RepositoryResult<Vec<ClientId>>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize>;
        fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client>;
        fn delete_client(&self, id: ClientId) -> RepositoryResult<()>;
    }

    impl LotReader for Repository {
        fn get_lot_by_id(&self, id: LotId) -> RepositoryResult<Option<Lot>>;
        fn list_lots(&self, query: LotListQuery) -> RepositoryResult<(usize, Vec<Lot>)>;
        fn count_lots(&self, status: Option<LotStatus>) -> RepositoryResult<i64>;
    }

    impl LotWriter for Repository {
        fn create_lot(&self, new_lot: &NewLot) -> RepositoryResult<Lot>;
        fn update_lot(&self, id: LotId, updates: &UpdateLot) -> RepositoryResult<Lot>;
        fn delete_lot(&self, id: LotId) -> RepositoryResult<()>;
    }

    impl ContractReader for Repository {
        fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<Contract>>;
        fn list_contracts(
            &self,
            query: ContractListQuery,
        ) -> RepositoryResult<(usize, Vec<Contract>)>;
        fn count_contracts(&self) -> RepositoryResult<i64>;
        fn sum_contract_values(&self) -> RepositoryResult<Option<f64>>;
        fn get_installment_by_id(&self, id: InstallmentId) -> RepositoryResult<Option<Installment>>;
        fn list_installments(&self, contract_id: ContractId) -> RepositoryResult<Vec<Installment>>;
        fn list_client_installments(
            &self,
            client_id: ClientId,
        ) -> RepositoryResult<Vec<Installment>>;
    }

    impl ContractWriter for Repository {
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
        fn pay_installment(
            &self,
            id: InstallmentId,
            data_pagamento: NaiveDate,
        ) -> RepositoryResult<Installment>;
    }

    impl InvoiceReader for Repository {
        fn get_invoice_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>>;
        fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)>;
    }

    impl InvoiceWriter for Repository {
        fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice>;
        fn update_invoice(&self, id: InvoiceId, updates: &UpdateInvoice) -> RepositoryResult<Invoice>;
        fn delete_invoice(&self, id: InvoiceId) -> RepositoryResult<()>;
    }

    impl DelinquencyReader for Repository {
        fn get_delinquency_by_id(
            &self,
            id: DelinquencyId,
        ) -> RepositoryResult<Option<DelinquencyRecord>>;
        fn get_delinquency_by_client(
            &self,
            client_id: ClientId,
        ) -> RepositoryResult<Option<DelinquencyRecord>>;
        fn list_delinquencies(
            &self,
            query: DelinquencyListQuery,
        ) -> RepositoryResult<(usize, Vec<DelinquencyRecord>)>;
        fn count_delinquencies(&self, status: &str) -> RepositoryResult<i64>;
        fn sum_open_amounts(&self, status: &str) -> RepositoryResult<Option<f64>>;
    }

    impl DelinquencyWriter for Repository {
        fn create_delinquency(
            &self,
            record: &NewDelinquencyRecord,
        ) -> RepositoryResult<DelinquencyRecord>;
        fn upsert_delinquency(
            &self,
            record: &NewDelinquencyRecord,
        ) -> RepositoryResult<DelinquencyRecord>;
        fn update_delinquency(
            &self,
            id: DelinquencyId,
            updates: &UpdateDelinquencyRecord,
        ) -> RepositoryResult<DelinquencyRecord>;
        fn delete_delinquency(&self, id: DelinquencyId) -> RepositoryResult<()>;
        fn record_last_contact(
            &self,
            client_id: ClientId,
            contacted_at: NaiveDateTime,
        ) -> RepositoryResult<usize>;
    }

    impl PriceAdjustmentReader for Repository {
        fn get_price_adjustment_by_id(
            &self,
            id: PriceAdjustmentId,
        ) -> RepositoryResult<Option<PriceAdjustment>>;
        fn list_price_adjustments(
            &self,
            query: PriceAdjustmentListQuery,
        ) -> RepositoryResult<(usize, Vec<PriceAdjustment>)>;
    }

    impl PriceAdjustmentWriter for Repository {
        fn create_price_adjustment(
            &self,
            new_adjustment: &NewPriceAdjustment,
        ) -> RepositoryResult<PriceAdjustment>;
        fn save_price_adjustment(
            &self,
            adjustment: &PriceAdjustment,
        ) -> RepositoryResult<PriceAdjustment>;
        fn apply_price_adjustment(
            &self,
            adjustment: &PriceAdjustment,
        ) -> RepositoryResult<(PriceAdjustment, usize)>;
        fn delete_price_adjustment(&self, id: PriceAdjustmentId) -> RepositoryResult<()>;
    }

    impl TriggerReader for Repository {
        fn get_trigger_config(&self) -> RepositoryResult<TriggerConfig>;
    }

    impl TriggerWriter for Repository {
        fn replace_trigger_config(&self, config: &NewTriggerConfig) -> RepositoryResult<TriggerConfig>;
    }

    impl CommunicationReader for Repository {
        fn get_communication_by_id(
            &self,
            id: CommunicationId,
        ) -> RepositoryResult<Option<Communication>>;
        fn list_communications(
            &self,
            query: ClientHistoryQuery,
        ) -> RepositoryResult<(usize, Vec<Communication>)>;
    }

    impl CommunicationWriter for Repository {
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

    impl InteractionReader for Repository {
        fn get_interaction_by_id(&self, id: InteractionId) -> RepositoryResult<Option<Interaction>>;
        fn list_interactions(
            &self,
            query: ClientHistoryQuery,
        ) -> RepositoryResult<(usize, Vec<Interaction>)>;
    }

    impl InteractionWriter for Repository {
        fn create_interaction(
            &self,
            new_interaction: &NewInteraction,
        ) -> RepositoryResult<Interaction>;
        fn update_interaction(
            &self,
            id: InteractionId,
            updates: &UpdateInteraction,
        ) -> RepositoryResult<Interaction>;
        fn delete_interaction(&self, id: InteractionId) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
        fn list_users(&self) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, id: UserId, updates: &UpdateUser) -> RepositoryResult<User>;
        fn delete_user(&self, id: UserId) -> RepositoryResult<()>;
    }
}
