//! 类型化的业务端点。
//!
//! 本地校验先于网络请求执行；校验失败不会发出任何请求。

use crate::{ApiClient, ApiError};
use api_contract::{
    ActionDto, BackupListDto, CreateBackupRequest, CreateRoleRequest, CreateSystemRequest,
    CreateUserRequest, FeatureDto, ItemDto, LoginRequest, LoginResponse, MaterialDto,
    MaterialRequest, OperationDto, ReportDto, ReportRequest, ResourceDto, RestoreBackupRequest,
    RoleDto, SensorDto, SensorRequest, SystemDto, TankDto, TankRequest, UpdatePasswordRequest,
    UpdateRoleRequest, UpdateSystemRequest, UpdateUserRequest, UpdateUsernameRequest, UserDto,
    WorkDto,
};
use domain::validation::{
    check_password_change, check_system_create, check_user_create, require_name,
};
use domain::{
    Action, Feature, Item, Material, Operation, PermissionDiff, Report, ReportDraft, Resource,
    Role, Sensor, System, Tank, Taxonomy, User, ValidationError, ValidationErrors, Work,
};

const SYSTEM_NAME_TAKEN: &str = "The system name already exists.";
const PASSWORD_INCORRECT: &str = "The password you entered is incorrect.";

fn convert<D, T: From<D>>(items: Vec<D>) -> Vec<T> {
    items.into_iter().map(T::from).collect()
}

/// WineSystem 全部 REST 端点。
#[derive(Debug, Clone)]
pub struct WineApi {
    client: ApiClient,
}

impl WineApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ApiClient {
        &mut self.client
    }

    // ---- 系统 ----

    pub async fn systems(&self) -> Result<Vec<System>, ApiError> {
        let systems: Vec<SystemDto> = self.client.get("/systems").await?;
        Ok(convert(systems))
    }

    pub async fn system(&self, system_id: i64) -> Result<System, ApiError> {
        let system: SystemDto = self.client.get(&format!("/systems/{system_id}")).await?;
        Ok(system.into())
    }

    /// 创建系统及其管理员；名称重复时服务端返回 400。
    pub async fn create_system(
        &self,
        request: &CreateSystemRequest,
        confirmation: &str,
    ) -> Result<(), ApiError> {
        check_system_create(
            &request.name,
            &request.owner_name,
            &request.password,
            confirmation,
        )?;
        let request = CreateSystemRequest {
            name: request.name.trim().to_string(),
            owner_name: request.owner_name.trim().to_string(),
            ..request.clone()
        };
        self.client
            .anonymous()
            .send_post("/systems", &request)
            .await
            .map_err(|err| err.with_status_message(400, SYSTEM_NAME_TAKEN))
    }

    pub async fn rename_system(&self, system_id: i64, name: &str) -> Result<(), ApiError> {
        let name = require_name(name, "name")?;
        self.update_system(
            system_id,
            &UpdateSystemRequest {
                name: Some(name),
                year: None,
            },
        )
        .await
    }

    pub async fn set_system_year(&self, system_id: i64, year: i32) -> Result<(), ApiError> {
        self.update_system(
            system_id,
            &UpdateSystemRequest {
                name: None,
                year: Some(year),
            },
        )
        .await
    }

    pub async fn update_system(
        &self,
        system_id: i64,
        request: &UpdateSystemRequest,
    ) -> Result<(), ApiError> {
        self.client
            .send_patch(&format!("/systems/{system_id}"), request)
            .await
    }

    pub async fn delete_system(&self, system_id: i64) -> Result<(), ApiError> {
        self.client.send_delete(&format!("/systems/{system_id}")).await
    }

    // ---- 登录 ----

    /// 登录并返回 token；不携带现有 token。
    pub async fn login(
        &self,
        system_id: i64,
        user_id: i64,
        password: &str,
    ) -> Result<String, ApiError> {
        if password.is_empty() {
            return Err(ValidationErrors::from(ValidationError::Required("password")).into());
        }
        let request = LoginRequest {
            system_id,
            user_id,
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .client
            .anonymous()
            .post(&format!("/systems/{system_id}/login"), &request)
            .await?;
        tracing::info!(system_id, user_id, "logged in");
        Ok(response.token)
    }

    // ---- 用户 ----

    /// 登录页在未登录时也需要列出用户。
    pub async fn users(&self, system_id: i64) -> Result<Vec<User>, ApiError> {
        let users: Vec<UserDto> = self
            .client
            .get(&format!("/systems/{system_id}/users"))
            .await?;
        Ok(convert(users))
    }

    pub async fn user_items(&self, system_id: i64) -> Result<Vec<Item>, ApiError> {
        self.items(&format!("/systems/{system_id}/users")).await
    }

    pub async fn create_user(
        &self,
        system_id: i64,
        request: &CreateUserRequest,
        confirmation: &str,
    ) -> Result<(), ApiError> {
        check_user_create(&request.name, &request.password, confirmation)?;
        let request = CreateUserRequest {
            name: request.name.trim().to_string(),
            ..request.clone()
        };
        self.client
            .send_post(&format!("/systems/{system_id}/users"), &request)
            .await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        request: &UpdateUserRequest,
    ) -> Result<(), ApiError> {
        let name = require_name(&request.name, "username")?;
        let request = UpdateUserRequest {
            name,
            ..request.clone()
        };
        self.client
            .send_put(&format!("/users/{user_id}"), &request)
            .await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.client.send_delete(&format!("/users/{user_id}")).await
    }

    pub async fn my_name(&self) -> Result<String, ApiError> {
        self.client.get("/users/me/name").await
    }

    pub async fn update_my_name(&self, name: &str) -> Result<(), ApiError> {
        let name = require_name(name, "username")?;
        self.client
            .send_put("/users/me/name", &UpdateUsernameRequest { name })
            .await
    }

    /// 修改口令；旧口令错误时服务端返回 400。
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), ApiError> {
        check_password_change(old_password, new_password, confirmation)?;
        let request = UpdatePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.client
            .send_put("/users/me/password", &request)
            .await
            .map_err(|err| err.with_status_message(400, PASSWORD_INCORRECT))
    }

    // ---- 角色与权限 ----

    pub async fn roles(&self, system_id: i64) -> Result<Vec<Role>, ApiError> {
        let roles: Vec<RoleDto> = self
            .client
            .get(&format!("/systems/{system_id}/roles"))
            .await?;
        Ok(convert(roles))
    }

    pub async fn create_role(&self, system_id: i64, name: &str) -> Result<(), ApiError> {
        let name = require_name(name, "name")?;
        self.client
            .send_post(
                &format!("/systems/{system_id}/roles"),
                &CreateRoleRequest { name },
            )
            .await
    }

    /// 改名并提交权限差量。
    pub async fn update_role(
        &self,
        role_id: i64,
        name: &str,
        diff: &PermissionDiff,
    ) -> Result<(), ApiError> {
        let name = require_name(name, "name")?;
        let request = UpdateRoleRequest::from_diff(name, diff);
        self.client
            .send_patch(&format!("/roles/{role_id}"), &request)
            .await
    }

    pub async fn delete_role(&self, role_id: i64) -> Result<(), ApiError> {
        self.client.send_delete(&format!("/roles/{role_id}")).await
    }

    pub async fn actions(&self) -> Result<Vec<Action>, ApiError> {
        let actions: Vec<ActionDto> = self.client.get("/actions").await?;
        Ok(convert(actions))
    }

    pub async fn resources(&self) -> Result<Vec<Resource>, ApiError> {
        let resources: Vec<ResourceDto> = self.client.get("/resources").await?;
        Ok(convert(resources))
    }

    // ---- 报告分类 ----

    pub async fn works(&self) -> Result<Vec<Work>, ApiError> {
        let works: Vec<WorkDto> = self.client.get("/works").await?;
        Ok(convert(works))
    }

    pub async fn operations(&self) -> Result<Vec<Operation>, ApiError> {
        let operations: Vec<OperationDto> = self.client.get("/operations").await?;
        Ok(convert(operations))
    }

    pub async fn features(&self) -> Result<Vec<Feature>, ApiError> {
        let features: Vec<FeatureDto> = self.client.get("/features").await?;
        Ok(convert(features))
    }

    /// 依次拉取作业、工序、特征并组装分类表。
    pub async fn taxonomy(&self) -> Result<Taxonomy, ApiError> {
        let works = self.works().await?;
        let operations = self.operations().await?;
        let features = self.features().await?;
        Ok(Taxonomy::new(works, operations, features))
    }

    // ---- 原料 ----

    pub async fn materials(&self, system_id: i64) -> Result<Vec<Material>, ApiError> {
        let materials: Vec<MaterialDto> = self
            .client
            .get(&format!("/systems/{system_id}/materials"))
            .await?;
        Ok(convert(materials))
    }

    pub async fn create_material(
        &self,
        system_id: i64,
        request: &MaterialRequest,
    ) -> Result<(), ApiError> {
        let request = MaterialRequest {
            name: require_name(&request.name, "name")?,
            note: request.note.clone(),
        };
        self.client
            .send_post(&format!("/systems/{system_id}/materials"), &request)
            .await
    }

    pub async fn update_material(
        &self,
        material_id: i64,
        request: &MaterialRequest,
    ) -> Result<(), ApiError> {
        let request = MaterialRequest {
            name: require_name(&request.name, "name")?,
            note: request.note.clone(),
        };
        self.client
            .send_put(&format!("/materials/{material_id}"), &request)
            .await
    }

    pub async fn delete_material(&self, material_id: i64) -> Result<(), ApiError> {
        self.client
            .send_delete(&format!("/materials/{material_id}"))
            .await
    }

    // ---- 酒罐 ----

    pub async fn tanks(&self, system_id: i64) -> Result<Vec<Tank>, ApiError> {
        let tanks: Vec<TankDto> = self
            .client
            .get(&format!("/systems/{system_id}/tanks"))
            .await?;
        Ok(convert(tanks))
    }

    pub async fn create_tank(&self, system_id: i64, request: &TankRequest) -> Result<(), ApiError> {
        let request = TankRequest {
            name: require_name(&request.name, "name")?,
            ..request.clone()
        };
        self.client
            .send_post(&format!("/systems/{system_id}/tanks"), &request)
            .await
    }

    pub async fn update_tank(&self, tank_id: i64, request: &TankRequest) -> Result<(), ApiError> {
        let request = TankRequest {
            name: require_name(&request.name, "name")?,
            ..request.clone()
        };
        self.client
            .send_put(&format!("/tanks/{tank_id}"), &request)
            .await
    }

    pub async fn delete_tank(&self, tank_id: i64) -> Result<(), ApiError> {
        self.client.send_delete(&format!("/tanks/{tank_id}")).await
    }

    // ---- 传感器 ----

    pub async fn sensors(&self, system_id: i64) -> Result<Vec<Sensor>, ApiError> {
        let sensors: Vec<SensorDto> = self
            .client
            .get(&format!("/systems/{system_id}/sensors"))
            .await?;
        Ok(convert(sensors))
    }

    pub async fn create_sensor(
        &self,
        system_id: i64,
        request: &SensorRequest,
    ) -> Result<(), ApiError> {
        let request = SensorRequest {
            name: require_name(&request.name, "name")?,
            ..request.clone()
        };
        self.client
            .send_post(&format!("/systems/{system_id}/sensors"), &request)
            .await
    }

    pub async fn update_sensor(
        &self,
        sensor_id: i64,
        request: &SensorRequest,
    ) -> Result<(), ApiError> {
        let request = SensorRequest {
            name: require_name(&request.name, "name")?,
            ..request.clone()
        };
        self.client
            .send_put(&format!("/sensors/{sensor_id}"), &request)
            .await
    }

    pub async fn delete_sensor(&self, sensor_id: i64) -> Result<(), ApiError> {
        self.client
            .send_delete(&format!("/sensors/{sensor_id}"))
            .await
    }

    // ---- 报告 ----

    pub async fn reports(&self, system_id: i64) -> Result<Vec<Report>, ApiError> {
        let reports: Vec<ReportDto> = self
            .client
            .get(&format!("/systems/{system_id}/reports"))
            .await?;
        Ok(convert(reports))
    }

    /// 按分类规则校验后提交新报告。
    pub async fn create_report(
        &self,
        system_id: i64,
        taxonomy: &Taxonomy,
        draft: ReportDraft,
        materials: &[Material],
        tanks: &[Tank],
    ) -> Result<ReportDraft, ApiError> {
        let draft = taxonomy.validate(draft, materials, tanks)?;
        self.client
            .send_post(
                &format!("/systems/{system_id}/reports"),
                &ReportRequest::from(&draft),
            )
            .await?;
        Ok(draft)
    }

    pub async fn update_report(
        &self,
        report_id: i64,
        taxonomy: &Taxonomy,
        draft: ReportDraft,
        materials: &[Material],
        tanks: &[Tank],
    ) -> Result<ReportDraft, ApiError> {
        let draft = taxonomy.validate(draft, materials, tanks)?;
        self.client
            .send_put(&format!("/reports/{report_id}"), &ReportRequest::from(&draft))
            .await?;
        Ok(draft)
    }

    pub async fn delete_report(&self, report_id: i64) -> Result<(), ApiError> {
        self.client
            .send_delete(&format!("/reports/{report_id}"))
            .await
    }

    // ---- 备份 ----

    pub async fn backups(&self) -> Result<Vec<String>, ApiError> {
        let list: BackupListDto = self.client.get("/backups").await?;
        Ok(list.backups)
    }

    pub async fn create_backup(&self, note: Option<String>) -> Result<(), ApiError> {
        let note = note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty());
        self.client
            .send_post("/backups", &CreateBackupRequest { note })
            .await
    }

    pub async fn restore_backup(&self, filename: &str) -> Result<(), ApiError> {
        let filename = require_name(filename, "filename")?;
        self.client
            .send_put("/backups", &RestoreBackupRequest { filename })
            .await
    }

    pub async fn delete_backup(&self, filename: &str) -> Result<(), ApiError> {
        let filename = require_name(filename, "filename")?;
        self.client
            .send_delete(&backup_path(&filename))
            .await
    }

    /// 选择器用的精简条目。
    pub async fn items(&self, path: &str) -> Result<Vec<Item>, ApiError> {
        let items: Vec<ItemDto> = self.client.get(path).await?;
        Ok(convert(items))
    }
}

/// 备份文件名作为单个路径段转义。
fn backup_path(filename: &str) -> String {
    format!("/backups/{}", urlencoding::encode(filename))
}
