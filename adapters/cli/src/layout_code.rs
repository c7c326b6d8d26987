#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use cannonade_core::{Command, FieldSize, PlayerId, Point};
use cannonade_world::{query, World};
use serde::{Deserialize, Serialize};

const BOARD_DOMAIN: &str = "cannonade";
const BOARD_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded board payload.
pub(crate) const BOARD_HEADER: &str = "cannonade:v1";
/// Delimiter used to separate the prefix, field dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of an opening board: the field, the skyline and both tanks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct BoardLayoutSnapshot {
    /// Width of the playing field in pixels.
    pub width: i32,
    /// Height of the playing field in pixels.
    pub height: i32,
    /// Buildings composing the skyline in placement order.
    pub buildings: Vec<BoardBuilding>,
    /// Tank emplacements in player order.
    pub tanks: Vec<BoardTank>,
}

impl BoardLayoutSnapshot {
    /// Captures the current board so it can be shared and replayed.
    #[must_use]
    pub(crate) fn capture(world: &World) -> Self {
        let field = query::field(world);
        let buildings = query::building_view(world)
            .iter()
            .map(|building| BoardBuilding {
                center_x: building.center_x,
                width: building.width,
                height: building.height,
            })
            .collect();
        let tanks = query::tank_view(world)
            .iter()
            .map(|tank| BoardTank {
                player: tank.player,
                position: tank.position,
            })
            .collect();

        Self {
            width: field.width(),
            height: field.height(),
            buildings,
            tanks,
        }
    }

    /// Commands that rebuild the captured board on a fresh world.
    #[must_use]
    pub(crate) fn commands(&self) -> Vec<Command> {
        let mut commands = vec![Command::ConfigureField {
            size: FieldSize::new(self.width, self.height),
        }];
        for building in &self.buildings {
            commands.push(Command::PlaceBuilding {
                center_x: building.center_x,
                width: building.width,
                height: building.height,
            });
        }
        for tank in &self.tanks {
            commands.push(Command::DeployTank {
                player: tank.player,
                position: tank.position,
            });
        }
        commands
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableBoard {
            buildings: self.buildings.clone(),
            tanks: self.tanks.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("board snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{BOARD_HEADER}:{}x{}:{encoded}", self.width, self.height)
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, BoardCodeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BoardCodeError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(BoardCodeError::MissingPrefix)?;
        let version = parts.next().ok_or(BoardCodeError::MissingVersion)?;
        let dimensions = parts.next().ok_or(BoardCodeError::MissingDimensions)?;
        let payload = parts.next().ok_or(BoardCodeError::MissingPayload)?;

        if domain != BOARD_DOMAIN {
            return Err(BoardCodeError::InvalidPrefix(domain.to_owned()));
        }
        if version != BOARD_VERSION {
            return Err(BoardCodeError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(BoardCodeError::InvalidEncoding)?;
        let decoded: SerializableBoard =
            serde_json::from_slice(&bytes).map_err(BoardCodeError::InvalidPayload)?;

        Ok(Self {
            width,
            height,
            buildings: decoded.buildings,
            tanks: decoded.tanks,
        })
    }
}

/// Building description captured within a board snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct BoardBuilding {
    /// Column of the building's horizontal center.
    pub center_x: i32,
    /// Full width of the building footprint.
    pub width: i32,
    /// Height of the building measured from the ground.
    pub height: i32,
}

/// Tank emplacement captured within a board snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct BoardTank {
    /// Player slot the tank belongs to.
    pub player: PlayerId,
    /// Fixed position the tank occupies.
    pub position: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableBoard {
    buildings: Vec<BoardBuilding>,
    tanks: Vec<BoardTank>,
}

/// Errors that can occur while decoding board code strings.
#[derive(Debug)]
pub(crate) enum BoardCodeError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded board.
    MissingPrefix,
    /// The encoded board did not contain a version segment.
    MissingVersion,
    /// The encoded board did not include field dimensions.
    MissingDimensions,
    /// The encoded board did not include the payload segment.
    MissingPayload,
    /// The encoded board used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded board used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The field dimensions could not be parsed from the encoded board.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for BoardCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "board code was empty"),
            Self::MissingPrefix => write!(f, "board code is missing the prefix"),
            Self::MissingVersion => write!(f, "board code is missing the version"),
            Self::MissingDimensions => write!(f, "board code is missing the field dimensions"),
            Self::MissingPayload => write!(f, "board code is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "board prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "board version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse field dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode board payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse board payload: {error}")
            }
        }
    }
}

impl Error for BoardCodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(i32, i32), BoardCodeError> {
    let (width, height) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| BoardCodeError::InvalidDimensions(dimensions.to_owned()))?;

    let width = width
        .trim()
        .parse::<i32>()
        .map_err(|_| BoardCodeError::InvalidDimensions(dimensions.to_owned()))?;
    let height = height
        .trim()
        .parse::<i32>()
        .map_err(|_| BoardCodeError::InvalidDimensions(dimensions.to_owned()))?;

    if width <= 0 || height <= 0 {
        return Err(BoardCodeError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cannonade_world::{self as world};

    #[test]
    fn round_trip_bare_board() {
        let snapshot = BoardLayoutSnapshot {
            width: 595,
            height: 375,
            buildings: Vec::new(),
            tanks: vec![
                BoardTank {
                    player: PlayerId::One,
                    position: Point::new(5, 0),
                },
                BoardTank {
                    player: PlayerId::Two,
                    position: Point::new(590, 0),
                },
            ],
        };

        let encoded = snapshot.encode();
        assert!(encoded.starts_with(&format!("{BOARD_HEADER}:595x375:")));

        let decoded = BoardLayoutSnapshot::decode(&encoded).expect("board decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn round_trip_populated_board() {
        let buildings = vec![
            BoardBuilding {
                center_x: 120,
                width: 30,
                height: 80,
            },
            BoardBuilding {
                center_x: 430,
                width: 30,
                height: 55,
            },
        ];
        let snapshot = BoardLayoutSnapshot {
            width: 595,
            height: 375,
            buildings,
            tanks: vec![
                BoardTank {
                    player: PlayerId::One,
                    position: Point::new(5, 0),
                },
                BoardTank {
                    player: PlayerId::Two,
                    position: Point::new(590, 0),
                },
            ],
        };

        let encoded = snapshot.encode();
        assert!(encoded.starts_with(&format!("{BOARD_HEADER}:595x375:")));

        let decoded = BoardLayoutSnapshot::decode(&encoded).expect("board decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn replaying_the_commands_captures_the_same_board() {
        let snapshot = BoardLayoutSnapshot {
            width: 400,
            height: 300,
            buildings: vec![BoardBuilding {
                center_x: 200,
                width: 30,
                height: 90,
            }],
            tanks: vec![
                BoardTank {
                    player: PlayerId::One,
                    position: Point::new(5, 0),
                },
                BoardTank {
                    player: PlayerId::Two,
                    position: Point::new(395, 90),
                },
            ],
        };

        let mut replayed = World::new();
        let mut events = Vec::new();
        for command in snapshot.commands() {
            world::apply(&mut replayed, command, &mut events);
        }

        assert_eq!(BoardLayoutSnapshot::capture(&replayed), snapshot);
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        let encoded = BoardLayoutSnapshot {
            width: 595,
            height: 375,
            buildings: Vec::new(),
            tanks: Vec::new(),
        }
        .encode()
        .replace("cannonade:v1:", "cannonade:v9:");

        assert!(matches!(
            BoardLayoutSnapshot::decode(&encoded),
            Err(BoardCodeError::UnsupportedVersion(_))
        ));
    }
}
