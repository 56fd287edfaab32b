use async_trait::async_trait;
use crowdfund_protocol_client::{ClientError, ClientResult, LedgerGateway};
use crowdfund_protocol_sdk::{
    AddressFinder, CampaignAccount, CrowdfundInstruction, CAMPAIGN_ACCOUNT_SPACE,
};
use solana_sdk::{
    hash::Hash, message::Message, pubkey::Pubkey, rent::Rent, signature::Signature,
    transaction::Transaction,
};
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use tracing::debug;

/// Flat fee charged to the payer of every executed transaction.
pub const MOCK_FEE_LAMPORTS: u64 = 5_000;

/// Failure to return from the next matching gateway call instead of executing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    Network,
    Timeout,
}

impl InjectedFailure {
    fn into_error(self, call: &str) -> ClientError {
        match self {
            Self::Network => ClientError::Network(format!("injected failure during {call}")),
            Self::Timeout => ClientError::Timeout(format!("injected timeout during {call}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockAccount {
    pub lamports: u64,
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// Account as referenced by one instruction.
#[derive(Debug, Clone, Copy)]
struct AccountRef {
    key: Pubkey,
    is_signer: bool,
    is_writable: bool,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, MockAccount>,
    confirmed: Vec<Signature>,
    send_failures: VecDeque<InjectedFailure>,
    query_failures: VecDeque<InjectedFailure>,
    program_account_queries: usize,
}

/// In-memory ledger that executes the crowdfunding program's rules.
///
/// Once signatures verify, the payer is charged [`MOCK_FEE_LAMPORTS`] whether
/// or not the instructions succeed. Instruction effects apply atomically: a
/// failing instruction leaves every other balance and record untouched.
pub struct MockLedger {
    address_finder: AddressFinder,
    rent: Rent,
    blockhash: Hash,
    state: Mutex<LedgerState>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::with_address_finder(AddressFinder::default())
    }

    pub fn with_address_finder(address_finder: AddressFinder) -> Self {
        Self {
            address_finder,
            rent: Rent::default(),
            blockhash: Hash::new_unique(),
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn address_finder(&self) -> AddressFinder {
        self.address_finder
    }

    pub fn program_id(&self) -> Pubkey {
        self.address_finder.program_id
    }

    /// Lamports a campaign account must keep to stay rent exempt.
    pub fn campaign_rent_exempt_minimum(&self) -> u64 {
        self.rent.minimum_balance(CAMPAIGN_ACCOUNT_SPACE)
    }

    pub async fn airdrop(&self, to: &Pubkey, lamports: u64) {
        let mut state = self.state.lock().await;
        let account = state.accounts.entry(*to).or_insert_with(|| MockAccount {
            lamports: 0,
            owner: self.address_finder.system_program_id,
            data: vec![],
        });
        account.lamports += lamports;
    }

    pub async fn balance(&self, address: &Pubkey) -> u64 {
        let state = self.state.lock().await;
        state.accounts.get(address).map_or(0, |a| a.lamports)
    }

    /// Insert or overwrite an account verbatim.
    pub async fn set_account(&self, address: Pubkey, account: MockAccount) {
        self.state.lock().await.accounts.insert(address, account);
    }

    pub async fn account(&self, address: &Pubkey) -> Option<MockAccount> {
        self.state.lock().await.accounts.get(address).cloned()
    }

    /// Decoded campaign state, bypassing the client.
    pub async fn campaign_account(&self, address: &Pubkey) -> Option<CampaignAccount> {
        let account = self.account(address).await?;
        CampaignAccount::try_from_account_data(&account.data).ok()
    }

    pub async fn fail_next_send(&self, failure: InjectedFailure) {
        self.state.lock().await.send_failures.push_back(failure);
    }

    pub async fn fail_next_query(&self, failure: InjectedFailure) {
        self.state.lock().await.query_failures.push_back(failure);
    }

    pub async fn confirmed_signatures(&self) -> Vec<Signature> {
        self.state.lock().await.confirmed.clone()
    }

    /// Number of `program_accounts` calls served so far.
    pub async fn program_account_queries(&self) -> usize {
        self.state.lock().await.program_account_queries
    }

    fn execute(&self, state: &mut LedgerState, tx: &Transaction) -> ClientResult<Signature> {
        if tx.message.recent_blockhash != self.blockhash {
            return Err(ClientError::Network(
                "transaction expired: blockhash not found".to_string(),
            ));
        }
        tx.verify()
            .map_err(|e| ClientError::ProgramRejected(format!("signature verification failed: {e}")))?;

        let keys = &tx.message.account_keys;
        let (payer, signature) = match (keys.first(), tx.signatures.first()) {
            (Some(payer), Some(signature)) => (*payer, *signature),
            _ => return Err(ClientError::Protocol("transaction has no fee payer".to_string())),
        };

        // Fee sticks even if an instruction fails below
        debit(&mut state.accounts, &payer, MOCK_FEE_LAMPORTS)
            .map_err(|e| ClientError::ProgramRejected(format!("fee: {e}")))?;
        let mut accounts = state.accounts.clone();

        for (index, ix) in tx.message.instructions.iter().enumerate() {
            let program_id = keys[ix.program_id_index as usize];
            if program_id != self.address_finder.program_id {
                return Err(ClientError::ProgramRejected(format!(
                    "instruction {index}: unsupported program {program_id}"
                )));
            }

            let refs: Vec<AccountRef> = ix
                .accounts
                .iter()
                .map(|&i| {
                    let i = i as usize;
                    AccountRef {
                        key: keys[i],
                        is_signer: is_signer(&tx.message, i),
                        is_writable: is_writable(&tx.message, i),
                    }
                })
                .collect();

            let instruction = CrowdfundInstruction::unpack(&ix.data).map_err(|e| {
                ClientError::ProgramRejected(format!("instruction {index}: {e}"))
            })?;
            let name = instruction.name();

            self.process(&mut accounts, &refs, instruction).map_err(|e| {
                ClientError::ProgramRejected(format!("instruction {index} ({name}): {e}"))
            })?;
        }

        state.accounts = accounts;
        state.confirmed.push(signature);
        Ok(signature)
    }

    fn process(
        &self,
        accounts: &mut HashMap<Pubkey, MockAccount>,
        refs: &[AccountRef],
        instruction: CrowdfundInstruction,
    ) -> Result<(), String> {
        match instruction {
            CrowdfundInstruction::Create { name, description } => {
                let [campaign, user, system_program] = refs else {
                    return Err(format!("expected 3 accounts, got {}", refs.len()));
                };
                require_writable_signer(user)?;
                require_writable(campaign)?;
                self.require_system_program(system_program)?;
                if !self
                    .address_finder
                    .verify_campaign_address(&campaign.key, &user.key)
                {
                    return Err("ConstraintSeeds: campaign is not derived from user".to_string());
                }
                if accounts
                    .get(&campaign.key)
                    .is_some_and(|a| a.lamports > 0 || !a.data.is_empty())
                {
                    return Err(format!("account {} already in use", campaign.key));
                }

                let data = CampaignAccount::new(user.key, name, description)
                    .to_allocated_account_data()
                    .map_err(|e| e.to_string())?;
                let rent = self.campaign_rent_exempt_minimum();
                debit(accounts, &user.key, rent)?;
                accounts.insert(
                    campaign.key,
                    MockAccount {
                        lamports: rent,
                        owner: self.address_finder.program_id,
                        data,
                    },
                );
                debug!(campaign = %campaign.key, "mock program: campaign created");
            }
            CrowdfundInstruction::Donate { amount } => {
                let [campaign, user, system_program] = refs else {
                    return Err(format!("expected 3 accounts, got {}", refs.len()));
                };
                require_writable_signer(user)?;
                require_writable(campaign)?;
                self.require_system_program(system_program)?;

                let mut record = self.load_campaign(accounts, &campaign.key)?;
                record.amount_donated = record
                    .amount_donated
                    .checked_add(amount)
                    .ok_or("amount_donated overflow")?;

                debit(accounts, &user.key, amount)?;
                credit(accounts, &campaign.key, amount);
                self.store_campaign(accounts, &campaign.key, &record)?;
            }
            CrowdfundInstruction::Withdraw { amount } => {
                let [campaign, user] = refs else {
                    return Err(format!("expected 2 accounts, got {}", refs.len()));
                };
                if !user.is_signer {
                    return Err("user must sign".to_string());
                }
                require_writable(campaign)?;

                let mut record = self.load_campaign(accounts, &campaign.key)?;
                if record.admin != user.key {
                    return Err("Unauthorized: only the campaign admin can withdraw".to_string());
                }
                if !user.is_writable {
                    return Err(format!("account {} is not writable", user.key));
                }

                let balance = accounts.get(&campaign.key).map_or(0, |a| a.lamports);
                let available = balance.saturating_sub(self.campaign_rent_exempt_minimum());
                if amount > available {
                    return Err(format!(
                        "insufficient funds: {available} lamports withdrawable, {amount} requested"
                    ));
                }

                record.amount_donated = record.amount_donated.saturating_sub(amount);
                debit(accounts, &campaign.key, amount)?;
                credit(accounts, &user.key, amount);
                self.store_campaign(accounts, &campaign.key, &record)?;
            }
        }
        Ok(())
    }

    fn require_system_program(&self, account: &AccountRef) -> Result<(), String> {
        if account.key != self.address_finder.system_program_id {
            return Err(format!("{} is not the system program", account.key));
        }
        Ok(())
    }

    fn load_campaign(
        &self,
        accounts: &HashMap<Pubkey, MockAccount>,
        address: &Pubkey,
    ) -> Result<CampaignAccount, String> {
        let account = accounts
            .get(address)
            .ok_or_else(|| format!("account {address} does not exist"))?;
        if account.owner != self.address_finder.program_id {
            return Err(format!("account {address} is not owned by the program"));
        }
        CampaignAccount::try_from_account_data(&account.data).map_err(|e| e.to_string())
    }

    fn store_campaign(
        &self,
        accounts: &mut HashMap<Pubkey, MockAccount>,
        address: &Pubkey,
        record: &CampaignAccount,
    ) -> Result<(), String> {
        let data = record
            .to_allocated_account_data()
            .map_err(|e| e.to_string())?;
        let account = accounts
            .get_mut(address)
            .ok_or_else(|| format!("account {address} does not exist"))?;
        account.data = data;
        Ok(())
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerGateway for MockLedger {
    async fn latest_blockhash(&self) -> ClientResult<Hash> {
        Ok(self.blockhash)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> ClientResult<Signature> {
        let mut state = self.state.lock().await;
        if let Some(failure) = state.send_failures.pop_front() {
            return Err(failure.into_error("send_and_confirm"));
        }
        self.execute(&mut state, transaction)
    }

    async fn program_accounts(&self, program_id: &Pubkey) -> ClientResult<Vec<(Pubkey, Vec<u8>)>> {
        let mut state = self.state.lock().await;
        if let Some(failure) = state.query_failures.pop_front() {
            return Err(failure.into_error("program_accounts"));
        }
        state.program_account_queries += 1;

        Ok(state
            .accounts
            .iter()
            .filter(|(_, account)| account.owner == *program_id)
            .map(|(address, account)| (*address, account.data.clone()))
            .collect())
    }

    async fn fetch_account(&self, address: &Pubkey) -> ClientResult<Option<Vec<u8>>> {
        let mut state = self.state.lock().await;
        if let Some(failure) = state.query_failures.pop_front() {
            return Err(failure.into_error("fetch_account"));
        }

        Ok(state
            .accounts
            .get(address)
            .filter(|account| account.lamports > 0 || !account.data.is_empty())
            .map(|account| account.data.clone()))
    }
}

fn is_signer(message: &Message, index: usize) -> bool {
    index < message.header.num_required_signatures as usize
}

fn is_writable(message: &Message, index: usize) -> bool {
    let header = &message.header;
    let num_signed = header.num_required_signatures as usize;
    if index < num_signed {
        index < num_signed - header.num_readonly_signed_accounts as usize
    } else {
        index < message.account_keys.len() - header.num_readonly_unsigned_accounts as usize
    }
}

fn require_writable(account: &AccountRef) -> Result<(), String> {
    if !account.is_writable {
        return Err(format!("account {} is not writable", account.key));
    }
    Ok(())
}

fn require_writable_signer(account: &AccountRef) -> Result<(), String> {
    if !account.is_signer {
        return Err(format!("account {} must sign", account.key));
    }
    require_writable(account)
}

fn debit(
    accounts: &mut HashMap<Pubkey, MockAccount>,
    address: &Pubkey,
    lamports: u64,
) -> Result<(), String> {
    let balance = accounts.get(address).map_or(0, |a| a.lamports);
    if balance < lamports {
        return Err(format!(
            "insufficient funds: {address} has {balance} lamports, needs {lamports}"
        ));
    }
    if let Some(account) = accounts.get_mut(address) {
        account.lamports -= lamports;
    }
    Ok(())
}

fn credit(accounts: &mut HashMap<Pubkey, MockAccount>, address: &Pubkey, lamports: u64) {
    accounts
        .entry(*address)
        .or_insert_with(|| MockAccount {
            lamports: 0,
            owner: Pubkey::default(),
            data: vec![],
        })
        .lamports += lamports;
}
