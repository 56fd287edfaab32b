use crate::{SdkError, SdkResult, CAMPAIGN_ACCOUNT_SPACE, DISCRIMINATOR_LEN};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;
use std::io::{Read, Write};

/// On-chain layout of a campaign account, after the discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignAccount {
    /// Creator of the campaign; the only identity allowed to withdraw.
    pub admin: Pubkey,

    pub name: String,

    pub description: String,

    /// Running total in lamports.
    pub amount_donated: u64,
}

impl CampaignAccount {
    /// `sha256("account:Campaign")[..8]`
    pub const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [50, 40, 49, 11, 157, 220, 229, 192];

    pub fn new(admin: Pubkey, name: String, description: String) -> Self {
        Self {
            admin,
            name,
            description,
            amount_donated: 0,
        }
    }

    /// Decode raw account data: discriminator, then the borsh body.
    ///
    /// Trailing bytes are allocation padding and are ignored.
    pub fn try_from_account_data(data: &[u8]) -> SdkResult<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(SdkError::Decoding(format!(
                "account data too short for discriminator ({} bytes)",
                data.len()
            )));
        }

        let (discriminator, mut body) = data.split_at(DISCRIMINATOR_LEN);
        if discriminator != Self::DISCRIMINATOR {
            return Err(SdkError::Decoding(format!(
                "unexpected account discriminator {discriminator:?}"
            )));
        }

        Self::deserialize(&mut body)
            .map_err(|e| SdkError::Decoding(format!("malformed campaign body: {e}")))
    }

    /// Discriminator followed by the borsh body, unpadded.
    pub fn to_account_data(&self) -> SdkResult<Vec<u8>> {
        let mut data = Vec::with_capacity(self.serialized_len());
        data.extend_from_slice(&Self::DISCRIMINATOR);
        self.serialize(&mut data)
            .map_err(|e| SdkError::Encoding(format!("failed to serialize campaign: {e}")))?;
        Ok(data)
    }

    /// Account data as the program writes it: zero padded to the allocation size.
    pub fn to_allocated_account_data(&self) -> SdkResult<Vec<u8>> {
        let mut data = self.to_account_data()?;
        if data.len() > CAMPAIGN_ACCOUNT_SPACE {
            return Err(SdkError::Encoding(format!(
                "campaign needs {} bytes, account holds {CAMPAIGN_ACCOUNT_SPACE}",
                data.len()
            )));
        }
        data.resize(CAMPAIGN_ACCOUNT_SPACE, 0);
        Ok(data)
    }

    /// Length of discriminator plus body.
    pub fn serialized_len(&self) -> usize {
        DISCRIMINATOR_LEN + 32 + 4 + self.name.len() + 4 + self.description.len() + 8
    }
}

impl BorshSerialize for CampaignAccount {
    fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.admin.to_bytes().serialize(writer)?;
        self.name.serialize(writer)?;
        self.description.serialize(writer)?;
        self.amount_donated.serialize(writer)
    }
}

impl BorshDeserialize for CampaignAccount {
    fn deserialize_reader<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let admin = <[u8; 32]>::deserialize_reader(reader)?;
        let name = String::deserialize_reader(reader)?;
        let description = String::deserialize_reader(reader)?;
        let amount_donated = u64::deserialize_reader(reader)?;

        Ok(Self {
            admin: Pubkey::new_from_array(admin),
            name,
            description,
            amount_donated,
        })
    }
}
