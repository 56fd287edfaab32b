use crate::{SdkError, SdkResult, DISCRIMINATOR_LEN, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use borsh::{BorshDeserialize, BorshSerialize};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    pub name: String,
    pub description: String,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountArgs {
    pub amount: u64,
}

/// The program's instruction set, as carried in instruction data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrowdfundInstruction {
    Create { name: String, description: String },
    Donate { amount: u64 },
    Withdraw { amount: u64 },
}

impl CrowdfundInstruction {
    /// `sha256("global:create")[..8]`
    pub const CREATE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [24, 30, 200, 40, 5, 28, 7, 119];
    /// `sha256("global:donate")[..8]`
    pub const DONATE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [121, 186, 218, 211, 73, 70, 196, 180];
    /// `sha256("global:withdraw")[..8]`
    pub const WITHDRAW_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
        [183, 18, 70, 156, 148, 109, 161, 34];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Donate { .. } => "donate",
            Self::Withdraw { .. } => "withdraw",
        }
    }

    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        match self {
            Self::Create { .. } => Self::CREATE_DISCRIMINATOR,
            Self::Donate { .. } => Self::DONATE_DISCRIMINATOR,
            Self::Withdraw { .. } => Self::WITHDRAW_DISCRIMINATOR,
        }
    }

    /// Client-side argument checks, run before anything is sent.
    pub fn validate(&self) -> SdkResult<()> {
        match self {
            Self::Create { name, description } => {
                if name.trim().is_empty() {
                    return Err(SdkError::Encoding("campaign name is empty".to_string()));
                }
                if name.len() > MAX_NAME_LEN {
                    return Err(SdkError::Encoding(format!(
                        "campaign name is {} bytes, max {MAX_NAME_LEN}",
                        name.len()
                    )));
                }
                if description.len() > MAX_DESCRIPTION_LEN {
                    return Err(SdkError::Encoding(format!(
                        "campaign description is {} bytes, max {MAX_DESCRIPTION_LEN}",
                        description.len()
                    )));
                }
            }
            Self::Donate { amount } | Self::Withdraw { amount } => {
                if *amount == 0 {
                    return Err(SdkError::Encoding(format!(
                        "{} amount must be greater than zero",
                        self.name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Instruction data: 8-byte sighash followed by the borsh-encoded args.
    pub fn pack(&self) -> SdkResult<Vec<u8>> {
        self.validate()?;

        let mut data = self.discriminator().to_vec();
        let written = match self {
            Self::Create { name, description } => CreateArgs {
                name: name.clone(),
                description: description.clone(),
            }
            .serialize(&mut data),
            Self::Donate { amount } | Self::Withdraw { amount } => {
                AmountArgs { amount: *amount }.serialize(&mut data)
            }
        };
        written.map_err(|e| SdkError::Encoding(format!("failed to serialize {}: {e}", self.name())))?;

        Ok(data)
    }

    /// Inverse of [`pack`](Self::pack). Args must consume the data exactly.
    pub fn unpack(data: &[u8]) -> SdkResult<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(SdkError::Decoding(format!(
                "instruction data too short for discriminator ({} bytes)",
                data.len()
            )));
        }
        let (discriminator, args) = data.split_at(DISCRIMINATOR_LEN);
        let malformed = |e: std::io::Error| SdkError::Decoding(format!("malformed args: {e}"));

        if discriminator == Self::CREATE_DISCRIMINATOR {
            let CreateArgs { name, description } = borsh::from_slice(args).map_err(malformed)?;
            Ok(Self::Create { name, description })
        } else if discriminator == Self::DONATE_DISCRIMINATOR {
            let AmountArgs { amount } = borsh::from_slice(args).map_err(malformed)?;
            Ok(Self::Donate { amount })
        } else if discriminator == Self::WITHDRAW_DISCRIMINATOR {
            let AmountArgs { amount } = borsh::from_slice(args).map_err(malformed)?;
            Ok(Self::Withdraw { amount })
        } else {
            Err(SdkError::Decoding(format!(
                "unknown instruction discriminator {discriminator:?}"
            )))
        }
    }
}
