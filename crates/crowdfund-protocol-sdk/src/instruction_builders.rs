use crate::{AddressFinder, CrowdfundInstruction, SdkError, SdkResult};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Accounts for `create`, in program order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateAccounts {
    pub campaign: Pubkey,
    pub user: Pubkey,
    pub system_program: Pubkey,
}

impl CreateAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.campaign, false),
            AccountMeta::new(self.user, true),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

/// Accounts for `donate`, in program order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonateAccounts {
    pub campaign: Pubkey,
    pub user: Pubkey,
    pub system_program: Pubkey,
}

impl DonateAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.campaign, false),
            AccountMeta::new(self.user, true),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

/// Accounts for `withdraw`, in program order.
///
/// `user` is listed read-only and unsigned. As fee payer it still ends up a
/// writable signer in the compiled message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawAccounts {
    pub campaign: Pubkey,
    pub user: Pubkey,
}

impl WithdrawAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.campaign, false),
            AccountMeta::new_readonly(self.user, false),
        ]
    }
}

/// The all-zero key stands in for "not provided".
pub(crate) fn require_present(key: &Pubkey, role: &'static str) -> SdkResult<()> {
    if *key == Pubkey::default() {
        return Err(SdkError::MissingAccount(role));
    }
    Ok(())
}

pub fn build_create_campaign_ix(
    address_finder: &AddressFinder,
    user: Pubkey,
    campaign: Pubkey,
    name: String,
    description: String,
) -> SdkResult<(Instruction, CreateAccounts, CrowdfundInstruction)> {
    require_present(&campaign, "campaign")?;
    require_present(&user, "user")?;

    let ix_accounts = CreateAccounts {
        campaign,
        user,
        system_program: address_finder.system_program_id,
    };

    let ix_data = CrowdfundInstruction::Create { name, description };

    let ix = Instruction {
        program_id: address_finder.program_id,
        accounts: ix_accounts.to_account_metas(),
        data: ix_data.pack()?,
    };

    Ok((ix, ix_accounts, ix_data))
}

pub fn build_donate_ix(
    address_finder: &AddressFinder,
    user: Pubkey,
    campaign: Pubkey,
    amount: u64,
) -> SdkResult<(Instruction, DonateAccounts, CrowdfundInstruction)> {
    require_present(&campaign, "campaign")?;
    require_present(&user, "user")?;

    let ix_accounts = DonateAccounts {
        campaign,
        user,
        system_program: address_finder.system_program_id,
    };

    let ix_data = CrowdfundInstruction::Donate { amount };

    let ix = Instruction {
        program_id: address_finder.program_id,
        accounts: ix_accounts.to_account_metas(),
        data: ix_data.pack()?,
    };

    Ok((ix, ix_accounts, ix_data))
}

pub fn build_withdraw_ix(
    address_finder: &AddressFinder,
    user: Pubkey,
    campaign: Pubkey,
    amount: u64,
) -> SdkResult<(Instruction, WithdrawAccounts, CrowdfundInstruction)> {
    require_present(&campaign, "campaign")?;
    require_present(&user, "user")?;

    let ix_accounts = WithdrawAccounts { campaign, user };

    let ix_data = CrowdfundInstruction::Withdraw { amount };

    let ix = Instruction {
        program_id: address_finder.program_id,
        accounts: ix_accounts.to_account_metas(),
        data: ix_data.pack()?,
    };

    Ok((ix, ix_accounts, ix_data))
}

/// Dispatch on an already-typed instruction.
pub fn build_crowdfund_ix(
    address_finder: &AddressFinder,
    user: Pubkey,
    campaign: Pubkey,
    instruction: &CrowdfundInstruction,
) -> SdkResult<Instruction> {
    let ix = match instruction {
        CrowdfundInstruction::Create { name, description } => {
            build_create_campaign_ix(
                address_finder,
                user,
                campaign,
                name.clone(),
                description.clone(),
            )?
            .0
        }
        CrowdfundInstruction::Donate { amount } => {
            build_donate_ix(address_finder, user, campaign, *amount)?.0
        }
        CrowdfundInstruction::Withdraw { amount } => {
            build_withdraw_ix(address_finder, user, campaign, *amount)?.0
        }
    };
    Ok(ix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account_roles() {
        let finder = AddressFinder::default();
        let user = Pubkey::new_unique();
        let (campaign, _) = finder.find_campaign_address(&user).unwrap();

        let (ix, accounts, data) = build_create_campaign_ix(
            &finder,
            user,
            campaign,
            "Water Well".to_string(),
            "Clean water".to_string(),
        )
        .unwrap();

        assert_eq!(ix.program_id, finder.program_id);
        assert_eq!(accounts.system_program, finder.system_program_id);
        assert_eq!(
            ix.accounts,
            vec![
                AccountMeta::new(campaign, false),
                AccountMeta::new(user, true),
                AccountMeta::new_readonly(finder.system_program_id, false),
            ]
        );
        assert_eq!(CrowdfundInstruction::unpack(&ix.data).unwrap(), data);
    }

    #[test]
    fn test_donate_account_roles() {
        let finder = AddressFinder::default();
        let user = Pubkey::new_unique();
        let campaign = Pubkey::new_unique();

        let (ix, _, _) = build_donate_ix(&finder, user, campaign, 5).unwrap();

        assert_eq!(ix.accounts.len(), 3);
        assert!(ix.accounts[0].is_writable && !ix.accounts[0].is_signer);
        assert!(ix.accounts[1].is_writable && ix.accounts[1].is_signer);
        assert!(!ix.accounts[2].is_writable && !ix.accounts[2].is_signer);
    }

    #[test]
    fn test_withdraw_account_roles() {
        let finder = AddressFinder::default();
        let user = Pubkey::new_unique();
        let campaign = Pubkey::new_unique();

        let (ix, _, _) = build_withdraw_ix(&finder, user, campaign, 5).unwrap();

        assert_eq!(
            ix.accounts,
            vec![
                AccountMeta::new(campaign, false),
                AccountMeta::new_readonly(user, false),
            ]
        );
    }

    #[test]
    fn test_missing_accounts_fail_fast() {
        let finder = AddressFinder::default();
        let user = Pubkey::new_unique();

        assert_eq!(
            build_donate_ix(&finder, user, Pubkey::default(), 1).unwrap_err(),
            SdkError::MissingAccount("campaign")
        );
        assert_eq!(
            build_withdraw_ix(&finder, Pubkey::default(), Pubkey::new_unique(), 1).unwrap_err(),
            SdkError::MissingAccount("user")
        );
    }

    #[test]
    fn test_invalid_args_fail_before_instruction_exists() {
        let finder = AddressFinder::default();
        let result = build_donate_ix(&finder, Pubkey::new_unique(), Pubkey::new_unique(), 0);
        assert!(matches!(result, Err(SdkError::Encoding(_))));
    }
}
