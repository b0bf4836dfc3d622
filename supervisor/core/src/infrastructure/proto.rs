// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Generated protobuf code for the component protocol, plus conversions
//! between wire messages and domain types.

pub mod component_v1 {
    tonic::include_proto!("cse.component.v1");
}

use crate::domain::component::{
    CommandInfo, ComponentMetadata, ComponentState, ComponentStatus,
};

impl From<component_v1::CommandInfo> for CommandInfo {
    fn from(info: component_v1::CommandInfo) -> Self {
        Self {
            name: info.command_name,
            description: info.description,
            parameters_schema: info.parameters_schema,
            result_schema: info.result_schema,
        }
    }
}

impl From<CommandInfo> for component_v1::CommandInfo {
    fn from(info: CommandInfo) -> Self {
        Self {
            command_name: info.name,
            description: info.description,
            parameters_schema: info.parameters_schema,
            result_schema: info.result_schema,
        }
    }
}

impl From<component_v1::ComponentMetadata> for ComponentMetadata {
    fn from(metadata: component_v1::ComponentMetadata) -> Self {
        Self {
            name: metadata.name,
            version: metadata.version,
            description: metadata.description,
            author: metadata.author,
            commands: metadata
                .provided_commands
                .into_iter()
                .map(CommandInfo::from)
                .collect(),
        }
    }
}

impl From<ComponentMetadata> for component_v1::ComponentMetadata {
    fn from(metadata: ComponentMetadata) -> Self {
        Self {
            name: metadata.name,
            version: metadata.version,
            description: metadata.description,
            author: metadata.author,
            provided_commands: metadata
                .commands
                .into_iter()
                .map(component_v1::CommandInfo::from)
                .collect(),
        }
    }
}

impl From<component_v1::ComponentState> for ComponentState {
    fn from(state: component_v1::ComponentState) -> Self {
        match state {
            component_v1::ComponentState::Unspecified => ComponentState::Unspecified,
            component_v1::ComponentState::Starting => ComponentState::Starting,
            component_v1::ComponentState::Running => ComponentState::Running,
            component_v1::ComponentState::Stopping => ComponentState::Stopping,
            component_v1::ComponentState::Failed => ComponentState::Failed,
        }
    }
}

impl From<ComponentState> for component_v1::ComponentState {
    fn from(state: ComponentState) -> Self {
        match state {
            ComponentState::Unspecified => component_v1::ComponentState::Unspecified,
            ComponentState::Starting => component_v1::ComponentState::Starting,
            ComponentState::Running => component_v1::ComponentState::Running,
            ComponentState::Stopping => component_v1::ComponentState::Stopping,
            ComponentState::Failed => component_v1::ComponentState::Failed,
        }
    }
}

impl From<component_v1::GetStatusResponse> for ComponentStatus {
    fn from(response: component_v1::GetStatusResponse) -> Self {
        Self {
            state: response.current_state().into(),
            message: response.message,
        }
    }
}
